//! Monitor configuration
//!
//! Settings can be loaded from a JSON file; every field is optional and falls
//! back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::controller::ControllerConfig;
use crate::tail::DEFAULT_BLOCK_SIZE;

/// Default delay between render refreshes in milliseconds
pub const DEFAULT_RENDER_INTERVAL_MS: u64 = 1000;

/// Default delay before the first render, letting a few samples arrive
pub const DEFAULT_RENDER_DELAY_MS: u64 = 2000;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("I/O error reading {}: {source}", .path.display())]
    IoError {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("Invalid configuration in {}: {source}", .path.display())]
    ParseError {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

/// Complete monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Controller connection settings
    pub controller: ControllerConfig,
    /// Log file path (none picks a timestamped default)
    pub log_path: Option<PathBuf>,
    /// Tail block size in bytes (0 or less reads the whole file)
    pub block_size: i64,
    /// Delay between render refreshes in milliseconds
    pub render_interval_ms: u64,
    /// Delay before the first render in milliseconds
    pub render_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            log_path: None,
            block_size: DEFAULT_BLOCK_SIZE,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            render_delay_ms: DEFAULT_RENDER_DELAY_MS,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    }

    /// Delay between render refreshes
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    /// Delay before the first render
    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }
}
