//! Contains all HTTP endpoint handlers.
//!
//! Use [`routes`] to create a router with all endpoints.

use axum::Router;
use serde::Serialize;

use crate::state::ServiceState;

pub mod health;
mod metrics;
mod work;

pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(health::router())
        .merge(work::router())
        .merge(metrics::router())
}

/// JSON body returned by all endpoints.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
