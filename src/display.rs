//! Colored CLI display utilities for notifier output.
//!
//! This module provides functions for printing colored, formatted output
//! to the terminal while the log monitor is running, plus the
//! [`ConsoleSink`] that routes trade events to the terminal.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use owo_colors::{OwoColorize, Style};

use crate::monitor::TradeSink;
use crate::watcher::TradeEvent;

/// Get current wall-clock time for trade rows.
fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Parse a `#rrggbb` hex color into its RGB components.
#[must_use]
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

/// Resolve a configured color value to a terminal style.
///
/// Accepts `#rrggbb` hex values and a small set of color names. Unknown
/// values resolve to `None` and the text is printed unstyled.
#[must_use]
pub fn color_style(color: &str) -> Option<Style> {
    if let Some((r, g, b)) = parse_hex_color(color) {
        return Some(Style::new().truecolor(r, g, b));
    }

    let style = match color.to_ascii_lowercase().as_str() {
        "black" => Style::new().black(),
        "red" => Style::new().red(),
        "green" => Style::new().green(),
        "yellow" => Style::new().yellow(),
        "blue" => Style::new().blue(),
        "magenta" | "purple" => Style::new().magenta(),
        "cyan" => Style::new().cyan(),
        "white" => Style::new().white(),
        _ => return None,
    };
    Some(style)
}

/// Find the style for a price by case-insensitive keyword lookup.
///
/// The first matching keyword in sorted order wins, so `"5 Exalted Orbs"`
/// picks up the color configured for `"exalted"`.
#[must_use]
pub fn price_style(color_map: &BTreeMap<String, String>, price: &str) -> Option<Style> {
    let price_lower = price.to_lowercase();
    color_map
        .iter()
        .find(|(keyword, _)| price_lower.contains(&keyword.to_lowercase()))
        .and_then(|(_, color)| color_style(color))
}

/// Print an incoming trade, with the price colored per the keyword map.
pub fn print_trade(event: &TradeEvent, style: Option<Style>) {
    let price = match style {
        Some(style) => event.price.style(style).to_string(),
        None => event.price.clone(),
    };
    println!(
        "{} {} {} ({})",
        timestamp().dimmed(),
        "[TRADE]".green().bold(),
        event.item.bold(),
        price
    );
    let _ = io::stdout().flush();
}

/// Ring the terminal bell.
pub fn ring_bell() {
    print!("\x07");
    let _ = io::stdout().flush();
}

/// Print the path being watched at startup.
pub fn print_watch_start(path: &Path) {
    println!(
        "{} Watching {}",
        "[WATCH]".blue().bold(),
        path.display().to_string().cyan()
    );
    let _ = io::stdout().flush();
}

/// Print the shutdown notice.
pub fn print_watch_stopped(clean: bool) {
    if clean {
        println!("{} Stopped", "[WATCH]".blue().bold());
    } else {
        println!(
            "{} Stopped (monitor did not exit in time)",
            "[WATCH]".yellow().bold()
        );
    }
    let _ = io::stdout().flush();
}

/// Print an error message.
pub fn print_error(message: &str) {
    println!("{} {}", "[ERROR]".red().bold(), message);
    let _ = io::stdout().flush();
}

/// Terminal sink that prints each trade and optionally rings the bell.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    /// Price keyword to color value, matched in sorted order.
    color_map: BTreeMap<String, String>,
    /// Ring the terminal bell on each trade.
    bell: bool,
}

impl ConsoleSink {
    /// Create a sink with the given price keyword color map.
    #[must_use]
    pub fn new(color_map: BTreeMap<String, String>) -> Self {
        Self {
            color_map,
            bell: true,
        }
    }

    /// Enable or disable the terminal bell on each trade.
    #[must_use]
    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }
}

impl TradeSink for ConsoleSink {
    fn on_trade(&self, event: TradeEvent) {
        print_trade(&event, price_style(&self.color_map, &event.price));
        if self.bell {
            ring_bell();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ffcc00"), Some((255, 204, 0)));
        assert_eq!(parse_hex_color("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_color_rejects_missing_hash() {
        assert_eq!(parse_hex_color("ffcc00"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_wrong_length() {
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#ffcc0000"), None);
        assert_eq!(parse_hex_color("#"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_invalid_digits() {
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_color_style_named_colors() {
        assert!(color_style("red").is_some());
        assert!(color_style("Yellow").is_some());
        assert!(color_style("purple").is_some());
    }

    #[test]
    fn test_color_style_hex() {
        assert!(color_style("#00ff00").is_some());
    }

    #[test]
    fn test_color_style_unknown_is_none() {
        assert!(color_style("notacolor").is_none());
        assert!(color_style("").is_none());
    }

    #[test]
    fn test_price_style_matches_case_insensitively() {
        let colors = map(&[("exalted", "#ffcc00")]);
        assert!(price_style(&colors, "5 EXALTED Orbs").is_some());
        assert!(price_style(&colors, "5 exalted").is_some());
    }

    #[test]
    fn test_price_style_no_keyword_match() {
        let colors = map(&[("exalted", "#ffcc00")]);
        assert!(price_style(&colors, "5 chaos").is_none());
        assert!(price_style(&BTreeMap::new(), "5 exalted").is_none());
    }

    #[test]
    fn test_price_style_first_sorted_keyword_wins() {
        // "divine" sorts before "exalted"; its invalid color value means
        // a price containing both keywords resolves to no style at all
        // rather than falling through to the later keyword.
        let colors = map(&[("divine", "notacolor"), ("exalted", "#ffcc00")]);
        assert!(price_style(&colors, "1 divine plus exalted").is_none());
        assert!(price_style(&colors, "5 exalted").is_some());
    }
}
