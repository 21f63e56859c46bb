//! Logging initialisation.

use crate::LoggingConfig;
use roletools_error::{ConfigError, RoleToolsResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. The fmt layer writes text or
/// JSON lines depending on `logging.json`.
pub fn init_logging(config: &LoggingConfig) -> RoleToolsResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level()))
        .map_err(|e| ConfigError::new(format!("Invalid log filter: {e}")))?;

    let fmt_layer = if *config.json() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {e}")))?;
    Ok(())
}
