//! One tailing-and-extraction run bound to a single log path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::monitor::sink::TradeSink;
use crate::monitor::state::SessionState;
use crate::watcher::{LogTailer, TradeExtractor, WatchError, DEFAULT_POLL_INTERVAL};

/// Error type for session operations.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// `start` was called while the session task is still alive.
    #[error("Session is already running")]
    AlreadyRunning,

    /// The log file could not be opened at session start.
    #[error("Cannot start monitor: {0}")]
    Open(#[from] WatchError),
}

/// Immutable per-session configuration.
///
/// A path change always means a new config and a new session; nothing
/// here can be mutated once a session has started.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    log_path: PathBuf,
    poll_interval: Duration,
}

impl MonitorConfig {
    /// Create a config for the given log path with the default poll
    /// interval.
    #[must_use]
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the tail poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the log path.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Get the tail poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// A monitor session owning one tailer and one background task.
///
/// Created in [`SessionState::Stopped`]; `start` spawns the task,
/// `stop` cancels it cooperatively and waits up to a timeout for it to
/// exit.
#[derive(Debug)]
pub struct MonitorSession {
    config: MonitorConfig,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl MonitorSession {
    /// Create a stopped session for the given config.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// Get the session config.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Compute the current lifecycle state from the task handle and the
    /// cancellation token.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.handle {
            None => SessionState::Stopped,
            Some(handle) if handle.is_finished() => SessionState::Stopped,
            Some(_) if self.cancel.is_cancelled() => SessionState::Stopping,
            Some(_) => SessionState::Running,
        }
    }

    /// Open the log at its current end and start the background monitor
    /// task.
    ///
    /// The open happens here, not in the task, so that once `start`
    /// returns every line appended afterwards is guaranteed to be seen.
    /// Read failures after start are logged once and terminate the task.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` unless the session is
    /// `Stopped`, or `SessionError::Open` if the log cannot be opened.
    pub async fn start(&mut self, sink: Arc<dyn TradeSink>) -> Result<(), SessionError> {
        if self.state() != SessionState::Stopped {
            return Err(SessionError::AlreadyRunning);
        }

        let tailer = LogTailer::open(self.config.log_path())
            .await?
            .with_poll_interval(self.config.poll_interval());

        let cancel = CancellationToken::new();
        self.cancel = cancel.clone();

        tracing::debug!(path = %self.config.log_path().display(), "Starting monitor session");
        self.handle = Some(tokio::spawn(run_monitor(tailer, sink, cancel)));
        Ok(())
    }

    /// Request a stop and wait up to `timeout` for the task to exit.
    ///
    /// Returns `true` if the session reached `Stopped` within the
    /// timeout (trivially true when it was not running). On `false` the
    /// task is still winding down and the log file handle may not be
    /// released yet; the session stays in `Stopping` until the task
    /// exits on its own.
    pub async fn stop(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return true;
        };

        self.cancel.cancel();
        match tokio::time::timeout(timeout, &mut *handle).await {
            Ok(join_result) => {
                self.handle = None;
                if let Err(e) = join_result {
                    tracing::error!(error = %e, "Monitor task failed during shutdown");
                }
                true
            }
            Err(_) => {
                tracing::warn!(
                    path = %self.config.log_path().display(),
                    timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    "Monitor task did not stop within timeout"
                );
                false
            }
        }
    }
}

/// The monitor loop: tail the log, extract, forward to the sink.
///
/// Cancellation is observed at every poll boundary, so the loop reacts
/// to a stop request within one poll interval.
async fn run_monitor(mut tailer: LogTailer, sink: Arc<dyn TradeSink>, cancel: CancellationToken) {
    let extractor = TradeExtractor::new();
    let path = tailer.path().to_path_buf();

    tracing::info!(path = %path.display(), "Monitoring log file");

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::debug!(path = %path.display(), "Monitor session cancelled");
                return;
            }
            line = tailer.next_line() => match line {
                Ok(line) => {
                    if let Some(event) = extractor.extract(&line) {
                        tracing::debug!(
                            item = %event.item,
                            price = %event.price,
                            "Trade request detected"
                        );
                        sink.on_trade(event);
                    }
                }
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Log read failed, stopping monitor"
                    );
                    return;
                }
            },
        }
    }
}
