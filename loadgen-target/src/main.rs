//! The load test target server.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use anyhow::Result;

fn main() -> Result<()> {
    loadgen_target::cli::execute()
}
