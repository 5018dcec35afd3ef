//! Watcher error types.

use std::path::PathBuf;

/// Errors that can occur while tailing the client log.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    /// Log file missing, unreadable, or permission-denied at open time.
    #[error("Log file unavailable: {path}: {source}")]
    FileUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A custom pattern does not capture both the item and the price.
    #[error("Trade pattern must have {expected} capture groups, found {found}")]
    MissingCaptureGroups { expected: usize, found: usize },

    /// Invalid regular expression.
    #[error("Invalid trade pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_unavailable_display() {
        let err = WatchError::FileUnavailable {
            path: PathBuf::from("/tmp/Client.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Log file unavailable"));
        assert!(msg.contains("/tmp/Client.txt"));
    }

    #[test]
    fn test_missing_capture_groups_display() {
        let err = WatchError::MissingCaptureGroups {
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Trade pattern must have 2 capture groups, found 1"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("seek failed");
        let watch_err: WatchError = io_err.into();
        assert!(matches!(watch_err, WatchError::Io(_)));
        assert!(watch_err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_from_regex_error() {
        let regex_err = regex::Regex::new("[invalid").unwrap_err();
        let watch_err: WatchError = regex_err.into();
        assert!(matches!(watch_err, WatchError::Pattern(_)));
        assert!(watch_err.to_string().contains("Invalid trade pattern"));
    }
}
