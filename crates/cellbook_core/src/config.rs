//! Session and logging configuration.
//!
//! # Responsibility
//! - Hold tunables for history depth, marquee thresholds and duplicate naming.
//! - Hold logging bootstrap settings consumed by `logging::init_logging`.
//! - Validate host-provided values before a session or logger uses them.
//!
//! # Invariants
//! - `history_limit` is at least 1.
//! - Marquee ratios are in `(0, 1]`.
//! - Log directories are absolute.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Undo/redo depth used when no config is supplied.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Share of an item's own area a marquee must cover to select it.
pub const DEFAULT_ITEM_RATIO: f64 = 0.10;
/// Share of the marquee's area an item must cover to be selected.
pub const DEFAULT_MARQUEE_RATIO: f64 = 0.50;
/// Suffix appended to duplicated cell titles.
pub const DEFAULT_DUPLICATE_SUFFIX: &str = " Copy";

const DEFAULT_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_FILES: usize = 5;

/// Configuration validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// `history_limit` is zero.
    ZeroHistoryLimit,
    /// A marquee ratio is outside `(0, 1]`.
    RatioOutOfRange { field: &'static str, value: f64 },
    /// Log level is not one of `trace|debug|info|warn|error`.
    UnsupportedLogLevel(String),
    /// Log directory is empty or relative.
    InvalidLogDir(String),
    /// Rotation settings would keep no log data.
    InvalidRotation,
    /// Config JSON could not be parsed.
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroHistoryLimit => write!(f, "history_limit must be at least 1"),
            Self::RatioOutOfRange { field, value } => {
                write!(f, "{field} must be in (0, 1], got {value}")
            }
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidLogDir(dir) => {
                write!(f, "log_dir must be a non-empty absolute path, got `{dir}`")
            }
            Self::InvalidRotation => {
                write!(f, "max_file_size_bytes and max_files must be non-zero")
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Dual threshold for marquee hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeThresholds {
    /// Minimum `overlap / item_area` (exclusive).
    pub item_ratio: f64,
    /// Minimum `overlap / marquee_area` (exclusive).
    pub marquee_ratio: f64,
}

impl Default for MarqueeThresholds {
    fn default() -> Self {
        Self {
            item_ratio: DEFAULT_ITEM_RATIO,
            marquee_ratio: DEFAULT_MARQUEE_RATIO,
        }
    }
}

/// Editor session tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Max entries kept in each of the undo and redo stacks.
    pub history_limit: usize,
    pub marquee: MarqueeThresholds,
    pub duplicate_title_suffix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            marquee: MarqueeThresholds::default(),
            duplicate_title_suffix: DEFAULT_DUPLICATE_SUFFIX.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        check_ratio("marquee.item_ratio", self.marquee.item_ratio)?;
        check_ratio("marquee.marquee_ratio", self.marquee.marquee_ratio)?;
        Ok(())
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { field, value })
    }
}

/// File logging bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file_size")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_log_files")]
    pub max_files: usize,
}

impl LoggingConfig {
    /// Config with default rotation for `log_dir` at the build-mode default
    /// level.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_LOG_FILES,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Returns a copy with the level lower-cased and `warning` folded to
    /// `warn`, after validating every field.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        let level = normalize_level(&self.level)?;
        if self.log_dir.as_os_str().is_empty() || !Path::new(&self.log_dir).is_absolute() {
            return Err(ConfigError::InvalidLogDir(
                self.log_dir.display().to_string(),
            ));
        }
        if self.max_file_size_bytes == 0 || self.max_files == 0 {
            return Err(ConfigError::InvalidRotation);
        }
        Ok(Self {
            level: level.to_string(),
            ..self.clone()
        })
    }
}

/// Default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
    }
}

fn default_log_file_size() -> u64 {
    DEFAULT_LOG_FILE_SIZE_BYTES
}

fn default_log_files() -> usize {
    DEFAULT_LOG_FILES
}
