//! Tracing initialisation for a pipeline run.

use anyhow::Result;
use stopscan_core::config::LoggingSection;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Install the global subscriber and return the run's session id.
///
/// `RUST_LOG` overrides the configured level; `--verbose` raises the
/// default to `debug`. Logs go to stderr so `--json` output stays clean.
pub fn init(config: &LoggingSection, verbose: bool) -> Result<String> {
    let session_id = Uuid::new_v4().to_string();
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!(
        session_id = %session_id,
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );

    Ok(session_id)
}
