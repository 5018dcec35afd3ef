//! Log tailing and trade extraction.
//!
//! Follows the client log as it grows and turns matching whisper lines
//! into structured trade events.

mod error;
mod extractor;
mod tailer;

pub use error::WatchError;
pub use extractor::{TradeEvent, TradeExtractor, TRADE_PATTERN};
pub use tailer::{LogTailer, DEFAULT_POLL_INTERVAL};
