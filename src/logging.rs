use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "wavegrid=info";

/// Where log events are written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    /// Logging is disabled
    Off,
    Stderr,
    /// Events are appended to a file
    File(PathBuf),
}

/// Install the global tracing subscriber.
///
/// `level` overrides `RUST_LOG`. When neither is set, only info and above is logged.
pub fn init_logging(target: LogTarget, level: Option<&str>) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = match &target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    result.map_err(|e| LoggingError::Install(e.to_string()))?;
    tracing::debug!(?target, "logging initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File, LoggingError> {
    OpenOptions::new().create(true).append(true).open(path).map_err(|e| LoggingError::OpenFile(path.to_path_buf(), e))
}

pub(crate) fn build_filter(level: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match level {
        Some(level) => {
            let directive = format!("wavegrid={level}");
            EnvFilter::try_new(&directive).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
        }
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))),
    }
}

/// Errors that can occur when setting up logging
#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("failed to open log file {0:?}: {1}")]
    OpenFile(PathBuf, io::Error),

    #[error("failed to install logger: {0}")]
    Install(String),
}
