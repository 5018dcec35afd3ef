//! Lifecycle management for the single active monitor session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::monitor::session::{MonitorConfig, MonitorSession, SessionError};
use crate::monitor::sink::TradeSink;
use crate::monitor::state::SessionState;

/// Default wait for a session to stop before it is abandoned.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Snapshot of the supervised session for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorStatus {
    /// Path of the tailed log.
    pub path: PathBuf,
    /// Lifecycle state of the session.
    pub state: SessionState,
}

/// Manages at most one active [`MonitorSession`].
///
/// The sink outlives sessions: it is shared across reconfigurations so
/// consumers keep receiving events when the watched path changes.
pub struct MonitorSupervisor {
    session: Option<MonitorSession>,
    sink: Arc<dyn TradeSink>,
    stop_timeout: Duration,
}

impl MonitorSupervisor {
    /// Create a supervisor with no active session.
    #[must_use]
    pub fn new(sink: Arc<dyn TradeSink>) -> Self {
        Self {
            session: None,
            sink,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    /// Set the bounded wait used when stopping a session.
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Switch monitoring to a new configuration.
    ///
    /// Stops the active session with the bounded wait, then starts a new
    /// session regardless of whether the old one stopped cleanly. A
    /// session that overruns the wait is abandoned; it only reads and is
    /// already cancelled, so it exits at its next poll boundary.
    ///
    /// Returns `true` if the previous session (if any) stopped cleanly.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Open` if the new log path cannot be
    /// opened; the old session is gone either way.
    pub async fn reconfigure(&mut self, config: MonitorConfig) -> Result<bool, SessionError> {
        let clean = self.stop().await;
        if !clean {
            tracing::warn!(
                path = %config.log_path().display(),
                "Previous session still stopping, starting replacement anyway"
            );
        }

        let mut session = MonitorSession::new(config);
        let started = session.start(Arc::clone(&self.sink)).await;
        self.session = Some(session);
        started?;
        Ok(clean)
    }

    /// Stop the active session, waiting up to the stop timeout.
    ///
    /// Returns `true` if no session was running or it stopped cleanly.
    pub async fn stop(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => session.stop(self.stop_timeout).await,
            None => true,
        }
    }

    /// Get the supervised session's path and state, if one exists.
    #[must_use]
    pub fn status(&self) -> Option<SupervisorStatus> {
        self.session.as_ref().map(|session| SupervisorStatus {
            path: session.config().log_path().to_path_buf(),
            state: session.state(),
        })
    }
}

impl std::fmt::Debug for MonitorSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSupervisor")
            .field("session", &self.session)
            .field("stop_timeout", &self.stop_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::sink::ChannelSink;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use tokio::time::timeout;

    const FAST_POLL: Duration = Duration::from_millis(20);
    const WAIT: Duration = Duration::from_secs(2);

    fn fast_config(path: &Path) -> MonitorConfig {
        MonitorConfig::new(path).with_poll_interval(FAST_POLL)
    }

    #[test]
    fn test_new_supervisor_has_no_status() {
        let (sink, _rx) = ChannelSink::channel();
        let supervisor = MonitorSupervisor::new(Arc::new(sink));
        assert!(supervisor.status().is_none());
    }

    #[tokio::test]
    async fn test_reconfigure_starts_session() {
        let file = NamedTempFile::new().unwrap();
        let (sink, _rx) = ChannelSink::channel();
        let mut supervisor = MonitorSupervisor::new(Arc::new(sink));

        let clean = supervisor.reconfigure(fast_config(file.path())).await.unwrap();
        assert!(clean);

        let status = supervisor.status().unwrap();
        assert_eq!(status.path, file.path());
        assert_eq!(status.state, SessionState::Running);

        supervisor.stop().await;
    }

    #[tokio::test]
    async fn test_reconfigure_switches_files() {
        let mut file_a = NamedTempFile::new().unwrap();
        let mut file_b = NamedTempFile::new().unwrap();
        let (sink, mut rx) = ChannelSink::channel();
        let mut supervisor = MonitorSupervisor::new(Arc::new(sink));

        supervisor.reconfigure(fast_config(file_a.path())).await.unwrap();

        writeln!(
            file_a,
            "@From A: Hi, I would like to buy your Chaos Orb listed for 5 exalted in Standard"
        )
        .unwrap();
        file_a.flush().unwrap();

        let event = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.item, "Chaos Orb");

        supervisor.reconfigure(fast_config(file_b.path())).await.unwrap();
        assert_eq!(supervisor.status().unwrap().path, file_b.path());

        // Appends to the old file no longer produce events; the new file
        // is live.
        writeln!(
            file_a,
            "@From A: Hi, I would like to buy your Old Item listed for 1 chaos in Standard"
        )
        .unwrap();
        file_a.flush().unwrap();
        writeln!(
            file_b,
            "@From B: Hi, I would like to buy your Divine Orb listed for 180 chaos in Standard"
        )
        .unwrap();
        file_b.flush().unwrap();

        let event = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(event.item, "Divine Orb");

        supervisor.stop().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reconfigure_to_missing_path_fails() {
        let (sink, _rx) = ChannelSink::channel();
        let mut supervisor = MonitorSupervisor::new(Arc::new(sink));

        let result = supervisor
            .reconfigure(fast_config(Path::new("/tmp/poe-supervisor-missing-4321.txt")))
            .await;
        assert!(result.is_err());

        // The failed session is still visible for diagnostics.
        let status = supervisor.status().unwrap();
        assert_eq!(status.state, SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_without_session() {
        let (sink, _rx) = ChannelSink::channel();
        let mut supervisor = MonitorSupervisor::new(Arc::new(sink));
        assert!(supervisor.stop().await);
    }

    #[tokio::test]
    async fn test_status_after_stop() {
        let file = NamedTempFile::new().unwrap();
        let (sink, _rx) = ChannelSink::channel();
        let mut supervisor = MonitorSupervisor::new(Arc::new(sink));

        supervisor.reconfigure(fast_config(file.path())).await.unwrap();
        assert!(supervisor.stop().await);

        let status = supervisor.status().unwrap();
        assert_eq!(status.state, SessionState::Stopped);
    }
}
