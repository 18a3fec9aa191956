//! Test utilities for the load generator and its target.
//!
//! See the modules for all available utilities.

pub mod server;
pub mod tracing;
