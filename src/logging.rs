//! Tracing setup.
//!
//! The terminal belongs to the UI, so log records go to a daily rolling file
//! instead of stderr. `RUST_LOG` takes precedence over the configured level.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

const LOG_FILE_PREFIX: &str = "dreamplay.log";

/// Resolve the log directory from settings or `<local data dir>/dreamplay/logs`.
pub fn log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .directory
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("dreamplay").join("logs")))
}

fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| Error::Logging(format!("invalid log filter {:?}: {e}", settings.level))),
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered records are flushed on exit.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir(settings) else {
        return Ok(None);
    };
    std::fs::create_dir_all(&dir)?;

    let filter = build_filter(settings)?;
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(Some(guard))
}
