//! Core logging bootstrap.
//!
//! # Responsibility
//! - Start a size-rotated file logger exactly once per process.
//! - Report which configuration is active.
//!
//! # Invariants
//! - Re-initialization with an identical (normalized) config is a no-op.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.
//! - Core log lines carry metadata only (`event=... module=... status=...`),
//!   never item content.

use crate::config::{ConfigError, LoggingConfig};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "cellbook";

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    config: LoggingConfig,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    /// Config did not pass validation.
    Config(ConfigError),
    /// Log directory could not be created.
    CreateDir { dir: PathBuf, source: std::io::Error },
    /// flexi_logger refused the spec or failed to start.
    Backend(flexi_logger::FlexiLoggerError),
    /// A logger is already running with a different config.
    AlreadyInitialized { level: String, log_dir: PathBuf },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::AlreadyInitialized { level, log_dir } => write!(
                f,
                "logging already initialized with level `{level}` at `{}`; refusing to switch",
                log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::AlreadyInitialized { .. } => None,
        }
    }
}

impl From<ConfigError> for LoggingError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<flexi_logger::FlexiLoggerError> for LoggingError {
    fn from(value: flexi_logger::FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Initializes file logging.
///
/// # Errors
/// - `Config` when the level or directory is invalid.
/// - `CreateDir` / `Backend` when the logger cannot start.
/// - `AlreadyInitialized` when a logger with another level or directory is
///   running.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let requested = config.normalized()?;

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(requested.clone()))?;
    if active.config.level != requested.level || active.config.log_dir != requested.log_dir {
        return Err(LoggingError::AlreadyInitialized {
            level: active.config.level.clone(),
            log_dir: active.config.log_dir.clone(),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(String, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.config.level.clone(), active.config.log_dir.clone()))
}

fn start_logger(config: LoggingConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDir {
        dir: config.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.level.as_str())?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(config.max_file_size_bytes),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=core_init module=logging status=ok level={} version={}",
        config.level,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config,
        _handle: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, LoggingError};
    use crate::config::LoggingConfig;

    #[test]
    fn init_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let other = tempfile::tempdir().expect("temp dir should be created");
        let config = LoggingConfig::new(dir.path()).with_level("info");

        init_logging(&config).expect("first init should succeed");
        init_logging(&config.clone().with_level("INFO")).expect("same config is idempotent");

        let err = init_logging(&config.clone().with_level("debug"))
            .expect_err("level conflict should fail");
        assert!(matches!(err, LoggingError::AlreadyInitialized { .. }));

        let err = init_logging(&LoggingConfig::new(other.path()).with_level("info"))
            .expect_err("directory conflict should fail");
        assert!(err.to_string().contains("refusing to switch"));

        let (level, log_dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(log_dir, dir.path());
    }

    #[test]
    fn init_rejects_relative_directory_before_touching_backend() {
        let err = init_logging(&LoggingConfig::new("relative/logs")).unwrap_err();
        assert!(matches!(err, LoggingError::Config(_)));
    }
}
