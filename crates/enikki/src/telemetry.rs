//! Tracing subscriber setup.

use crate::LogFormat;
use enikki_error::{ConfigError, EnikkiResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,enikki=debug";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "debug";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the default filter; `verbose` overrides
/// both.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a subscriber is already installed.
pub fn init_telemetry(verbose: bool, format: LogFormat) -> EnikkiResult<()> {
    let env_filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
    };

    result.map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;
    Ok(())
}
