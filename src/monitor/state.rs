//! Session lifecycle states.

use serde::{Deserialize, Serialize};

/// Current state of a monitor session.
///
/// Transitions: `Stopped --start--> Running --stop--> Stopping --task
/// exits--> Stopped`. A session whose task fails goes straight from
/// `Running` to `Stopped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No background task is alive.
    #[default]
    Stopped,
    /// The background task is tailing the log.
    Running,
    /// Stop was requested; the task has not exited yet.
    Stopping,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(SessionState::default(), SessionState::Stopped);
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Stopped.to_string(), "stopped");
        assert_eq!(SessionState::Running.to_string(), "running");
        assert_eq!(SessionState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&SessionState::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let state: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, SessionState::Running);
    }
}
