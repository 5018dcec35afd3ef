//! Trade-whisper extraction.
//!
//! Turns raw client log lines into structured trade events.

use regex::Regex;

use super::error::WatchError;

/// Pattern matching trade-request whispers from the official trade site.
///
/// Example line:
/// `@From Buyer: Hi, I would like to buy your Chaos Orb listed for 5 exalted in Standard ...`
///
/// Group 1 captures the item name, group 2 the offered price. Both are
/// non-greedy so the item name cannot swallow the price clause.
pub const TRADE_PATTERN: &str =
    r"@From .*?: Hi, I would like to buy your (.*?) listed for (.*?) in";

/// Capture groups a trade pattern must provide: item and price.
const REQUIRED_CAPTURES: usize = 2;

/// One detected trade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    /// Trimmed item name.
    pub item: String,
    /// Price text exactly as written in the log, trimmed but not parsed.
    pub price: String,
}

/// Compiled matcher that extracts [`TradeEvent`]s from log lines.
#[derive(Debug, Clone)]
pub struct TradeExtractor {
    pattern: Regex,
}

impl Default for TradeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeExtractor {
    /// Create an extractor using [`TRADE_PATTERN`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(TRADE_PATTERN).expect("built-in trade pattern compiles"),
        }
    }

    /// Create an extractor with a custom whisper pattern.
    ///
    /// The pattern must capture the item name in group 1 and the price in
    /// group 2.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Pattern` if the regex is invalid, or
    /// `WatchError::MissingCaptureGroups` if it has fewer than two capture
    /// groups.
    pub fn with_pattern(pattern: &str) -> Result<Self, WatchError> {
        let pattern = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group.
        let found = pattern.captures_len() - 1;
        if found < REQUIRED_CAPTURES {
            return Err(WatchError::MissingCaptureGroups {
                expected: REQUIRED_CAPTURES,
                found,
            });
        }
        Ok(Self { pattern })
    }

    /// Get the pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Extract a trade event from a log line.
    ///
    /// The pattern is searched anywhere in the line. Returns `None` for
    /// lines that do not match and for matches where the item or price is
    /// empty after trimming.
    #[must_use]
    pub fn extract(&self, line: &str) -> Option<TradeEvent> {
        let captures = self.pattern.captures(line)?;
        let item = captures.get(1)?.as_str().trim();
        let price = captures.get(2)?.as_str().trim();
        if item.is_empty() || price.is_empty() {
            return None;
        }
        Some(TradeEvent {
            item: item.to_string(),
            price: price.to_string(),
        })
    }
}
