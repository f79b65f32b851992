//! Logging initialisation via tracing-subscriber.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; `level` is used when it is unset or invalid.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid log level '{}': {}", level, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to set subscriber: {}", e))?;

    Ok(())
}
