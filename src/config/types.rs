//! Persisted notifier settings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings persisted as JSON in the user config directory.
///
/// The monitor only consumes `log_file`; the color map belongs to the
/// presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Path of the client log to tail.
    pub log_file: PathBuf,

    /// Price keyword to display color, e.g. `"exalted" -> "#ffcc00"`.
    ///
    /// Keys are matched case-insensitively against the price text; the
    /// sorted map keeps lookup order stable regardless of how the JSON
    /// file orders its entries.
    pub currency_color_map: BTreeMap<String, String>,
}

impl NotifierConfig {
    /// Whether a log file path has been configured.
    #[must_use]
    pub fn has_log_file(&self) -> bool {
        !self.log_file.as_os_str().is_empty()
    }
}
