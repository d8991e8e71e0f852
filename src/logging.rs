//! Structured logging setup.

use crate::config::LoggingConfig;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured filter. Only the first call in a
/// process has an effect, and an already installed global subscriber is
/// left in place.
pub fn init(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.json {
            registry.with(fmt::layer().json().with_target(true)).try_init()
        } else {
            registry.with(fmt::layer().with_target(true)).try_init()
        };

        if installed.is_err() {
            tracing::debug!("global tracing subscriber already installed");
        }
    });
}
