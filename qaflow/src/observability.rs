//! Log subscriber setup.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary embedding qaflow, which can call [`init_logging`] once at
//! startup.

use crate::config::LoggingConfig;
use crate::errors::QaflowError;
use tracing_subscriber::EnvFilter;

/// Builds the event filter for the given logging settings.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, QaflowError> {
    EnvFilter::try_new(&config.filter)
        .map_err(|e| QaflowError::Config(format!("invalid log filter '{}': {e}", config.filter)))
}

/// Installs the global `tracing` subscriber.
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), QaflowError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| QaflowError::Config(format!("failed to install log subscriber: {e}")))
}
