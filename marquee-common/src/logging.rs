//! Logging initialization
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.
//! Work that runs before the configuration is known (loading it, mostly)
//! logs through a scoped bootstrap subscriber at the default level.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the env filter for the given logging configuration
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| Error::Config(format!("invalid log level '{}': {}", config.level, e)))
}

/// Install the global tracing subscriber (stderr, fmt layer)
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Internal(format!("failed to install tracing subscriber: {}", e)))
}

/// Run `f` under a scoped stderr subscriber using the default level
///
/// The global subscriber is left untouched, so `init_tracing` can still be
/// called afterwards.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter = build_filter(&LoggingConfig::default()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::with_default(subscriber, f)
}
