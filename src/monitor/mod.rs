//! Session lifecycle for the log monitor.
//!
//! A [`MonitorSession`] runs the tail-extract-forward loop on a
//! background task; the [`MonitorSupervisor`] keeps at most one session
//! alive and handles path changes.

mod session;
mod sink;
mod state;
mod supervisor;

pub use session::{MonitorConfig, MonitorSession, SessionError};
pub use sink::{ChannelSink, TradeSink};
pub use state::SessionState;
pub use supervisor::{MonitorSupervisor, SupervisorStatus, DEFAULT_STOP_TIMEOUT};
