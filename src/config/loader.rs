//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::NotifierConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .poe-trade-notifier.json
        search_paths.push(PathBuf::from(".poe-trade-notifier.json"));

        // 2. User config directory: ~/.config/poe-trade-notifier/config.json
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("poe-trade-notifier").join("config.json"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<NotifierConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(NotifierConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &Path) -> Result<NotifierConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the configuration to [`Self::save_path`], creating parent
    /// directories as needed.
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be encoded or written.
    pub fn save(&self, config: &NotifierConfig) -> Result<PathBuf, ConfigError> {
        let path = self.save_path();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Saved config file");
        Ok(path)
    }

    /// Load the config, point `log_file` at `path`, and write it back.
    ///
    /// The rest of the config, such as the currency color map, is kept
    /// intact. Returns the updated config and the path it was written to.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config cannot be read, or the
    /// updated one cannot be written.
    pub fn set_log_file(&self, path: PathBuf) -> Result<(NotifierConfig, PathBuf), ConfigError> {
        let mut config = self.load()?;
        config.log_file = path;
        let written = self.save(&config)?;
        Ok((config, written))
    }

    /// Path that [`Self::save`] writes to: the first existing config file,
    /// or the last search path (the user config directory) when no file
    /// exists yet.
    #[must_use]
    pub fn save_path(&self) -> PathBuf {
        self.find_config_file().unwrap_or_else(|| {
            self.search_paths
                .last()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".poe-trade-notifier.json"))
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode config: {0}")]
    EncodeError(#[from] serde_json::Error),
}
