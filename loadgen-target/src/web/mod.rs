//! HTTP server of the target.
//!
//! [`router`] assembles endpoints and middleware, [`serve`] runs it on a listener until a shutdown
//! future resolves, and [`server`] ties both to the configured address and process signals.
//! Integration tests run the same router in-process through `loadgen-test`.

mod app;
mod middleware;
mod server;

pub use app::{router, serve};
pub use server::server;
