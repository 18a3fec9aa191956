//! Log output of the target server.

use std::env;
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, prelude::*};

use crate::config::{LogFormat, Logging};

/// Installs the global subscriber writing to stderr.
pub fn init_tracing(logging: &Logging) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let pretty = match logging.format {
        LogFormat::Auto => std::io::stderr().is_terminal(),
        LogFormat::Pretty => true,
        LogFormat::Simplified | LogFormat::Json => false,
    };
    let layer = match logging.format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        _ if pretty => layer.pretty().boxed(),
        _ => layer.with_ansi(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(log_filter(logging.level)))
        .init();
}

/// Builds the filter from `RUST_LOG` if set, otherwise from `level`.
///
/// Without a `RUST_LOG` directive, dependencies other than the HTTP middleware are capped at
/// `info`.
fn log_filter(level: LevelFilter) -> EnvFilter {
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(format!(
            "{},tower_http={level},loadgen_target={level}",
            level.min(LevelFilter::INFO)
        )),
    }
}
