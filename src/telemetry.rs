//! Tracing subscriber setup for binaries and tests embedding the engine.
//!
//! The library itself only emits events; installing a subscriber is the
//! caller's decision.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Builds the filter: `RUST_LOG` when set, the configured level otherwise.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|source| TelemetryError::EnvFilter {
            value: settings.level.clone(),
            source,
        }),
    }
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    let filter = env_filter(settings)?;

    match settings.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
    }
    .map_err(TelemetryError::Subscriber)
}
