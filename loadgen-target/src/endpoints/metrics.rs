use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Router, routing};

use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new().route("/metrics", routing::get(metrics))
}

/// Request counters in plain text, one `name value` pair per line.
async fn metrics(State(state): State<ServiceState>) -> impl IntoResponse {
    format!(
        "heavywork_requests_total {}\n",
        state.counters.heavywork()
    )
}
