use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use crate::types::Points;
use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| Error::TelemetryError(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::TelemetryError(e.to_string()))
}

pub fn trace_spend(amount: Points) -> Span {
    tracing::info_span!(
        "spend_points",
        amount = amount.to_i64(),
    )
}
