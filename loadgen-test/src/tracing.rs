//! Log capture for tests.

use tracing_subscriber::EnvFilter;

/// Routes logs of the workspace crates into the test harness output.
///
/// `RUST_LOG` replaces the default filter. Safe to call from every test.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,loadgen=trace,loadgen_target=trace"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}
