//! Tracing subscriber setup.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServiceConfig};

/// Tracing initialisation errors.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("Tracing already initialised: {0}")]
    AlreadyInitialized(String),
}

/// Installs the global fmt subscriber described by `config.log`.
///
/// The filter directive is parsed here and nowhere else.
///
/// Fails instead of panicking when a global subscriber is already set, so
/// embedding processes and tests can call it more than once.
pub fn init_tracing(config: &ServiceConfig) -> Result<(), TelemetryError> {
    let log = &config.log;
    let filter = EnvFilter::try_new(&log.filter)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    let result = match log.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
