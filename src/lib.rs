//! PoE Trade Notifier - trade-whisper monitoring for the Path of Exile client log.

pub mod config;
pub mod display;
pub mod monitor;
pub mod watcher;
