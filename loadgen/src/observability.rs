//! Logging setup for the load generator.

use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Logging;

/// Initializes logging to stderr.
///
/// `RUST_LOG` is used verbatim if set, otherwise the configured filter applies. Fails if the
/// configured filter does not parse.
pub fn init_tracing(logging: &Logging) -> Result<()> {
    let env_filter = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => EnvFilter::new(value),
        Err(_) => EnvFilter::try_new(&logging.filter)
            .with_context(|| format!("invalid log filter `{}`", logging.filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();

    Ok(())
}
