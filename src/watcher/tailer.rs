//! Incremental client log tailer.
//!
//! Follows a growing log file from its current end and yields complete
//! appended lines in order.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

use super::error::WatchError;

/// Sleep between polls when no new data is available.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Incremental log reader that tracks read position.
///
/// Opens at end-of-file, so content written before the tailer is created
/// is never delivered. Only complete (newline-terminated) lines are
/// yielded; a trailing partial line stays in the file until its
/// terminator arrives. Lines are decoded lossily, so bytes that are not
/// valid UTF-8 become replacement characters rather than read errors.
#[derive(Debug)]
pub struct LogTailer {
    /// Path to the log file.
    path: PathBuf,
    /// Byte offset of the next unread content.
    offset: u64,
    /// Complete lines read but not yet handed out.
    pending: VecDeque<String>,
    /// Poll interval used by [`next_line`](Self::next_line).
    poll_interval: Duration,
}

impl LogTailer {
    /// Open a tailer positioned at the current end of the file.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::FileUnavailable` if the file cannot be opened
    /// or its length cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, WatchError> {
        let path = path.into();
        let file = File::open(&path)
            .await
            .map_err(|source| WatchError::FileUnavailable {
                path: path.clone(),
                source,
            })?;
        let metadata = file
            .metadata()
            .await
            .map_err(|source| WatchError::FileUnavailable {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            offset: metadata.len(),
            pending: VecDeque::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Set the poll interval used when waiting for new data.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get the path being tailed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current byte offset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read any complete lines appended since the last read.
    ///
    /// Returns an empty vector when the file has not grown. If the file
    /// shrank since the last read (truncation or replacement), the offset
    /// is reset and reading resumes from the start of the new content.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::FileUnavailable` if the file disappeared, or
    /// `WatchError::Io` for read failures.
    pub async fn read_new_lines(&mut self) -> Result<Vec<String>, WatchError> {
        self.poll_file().await?;
        Ok(self.pending.drain(..).collect())
    }

    /// Wait for the next complete appended line.
    ///
    /// Sleeps for the poll interval whenever no new data is available, so
    /// this suspends indefinitely on a quiet file. Callers that need to
    /// stop waiting race this future against their own cancellation
    /// signal; no read progress is lost when the future is dropped.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::FileUnavailable` if the file disappeared, or
    /// `WatchError::Io` for read failures.
    pub async fn next_line(&mut self) -> Result<String, WatchError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(line);
            }
            if self.poll_file().await? == 0 {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }

    /// Convert the tailer into an endless stream of appended lines.
    ///
    /// Consumers should treat an `Err` item as terminal.
    pub fn into_line_stream(self) -> impl futures_core::Stream<Item = Result<String, WatchError>> {
        futures_util::stream::unfold(self, |mut tailer| async {
            let line = tailer.next_line().await;
            Some((line, tailer))
        })
    }

    /// Read one batch of complete lines into the pending queue.
    ///
    /// Returns the number of lines added. The offset and the queue are
    /// updated together after all reads complete, so dropping this future
    /// mid-read (cancellation) re-reads the same region on the next poll
    /// instead of losing lines.
    async fn poll_file(&mut self) -> Result<usize, WatchError> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(source) => {
                return Err(WatchError::FileUnavailable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let file_len = file.metadata().await?.len();

        // Truncation or replacement: the file shrank below our position.
        if file_len < self.offset {
            tracing::warn!(
                path = %self.path.display(),
                old_offset = self.offset,
                new_len = file_len,
                "Log file shrank, resetting to start"
            );
            self.offset = 0;
        }

        if file_len == self.offset {
            return Ok(0);
        }

        file.seek(std::io::SeekFrom::Start(self.offset)).await?;

        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut consumed = 0u64;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 {
                break;
            }
            if buf.last() != Some(&b'\n') {
                // Unterminated tail; leave it in the file until complete.
                break;
            }
            consumed += bytes_read as u64;
            // The client log is not guaranteed to be valid UTF-8.
            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim_end_matches(['\n', '\r']);
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        // Commit point: no awaits below.
        self.offset += consumed;
        let count = lines.len();
        self.pending.extend(lines);
        Ok(count)
    }
}
