//! Configuration file support.
//!
//! Settings are stored as versioned JSON. Missing fields fall back to their
//! defaults so older files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ocr, zoom};
use crate::format::ExportScope;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Errors raised while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading or writing the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid configuration JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File was written by a newer version
    #[error("Unsupported config version {found} (newest supported is {supported})")]
    VersionMismatch {
        /// Version found in the file
        found: u32,
        /// Newest version this build understands
        supported: u32,
    },
}

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Install the global logger at the given level.
///
/// `RUST_LOG` still overrides per-module filters. A second call is ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Recognition settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Export defaults
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            ocr: OcrConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Zoom applied after the first upload
    #[serde(default = "default_zoom")]
    pub default_zoom: f32,
}

fn default_zoom() -> f32 {
    zoom::DEFAULT
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            default_zoom: default_zoom(),
        }
    }
}

/// OCR section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Run recognition automatically when a region is committed
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Language hint passed to the recognizer
    #[serde(default = "default_language")]
    pub language: String,

    /// Ignore results from requests superseded by a newer one for the same region
    #[serde(default)]
    pub drop_stale_completions: bool,
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    ocr::LANGUAGE.to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_language(),
            drop_stale_completions: false,
        }
    }
}

/// Export section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Format id used when none is given
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Pages covered when none is given
    #[serde(default)]
    pub scope: ExportScope,
}

fn default_format() -> String {
    "csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            scope: ExportScope::default(),
        }
    }
}

impl AppConfig {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, rejecting files from a newer format version.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    /// Load from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Platform config location, e.g. `~/.config/region-ocr/config.json`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("region-ocr").join("config.json"))
    }
}
