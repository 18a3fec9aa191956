use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};

use crate::endpoints::Message;
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/heavywork", routing::post(heavywork))
        .route("/lightwork", routing::post(lightwork))
}

/// Accepts a unit of heavy work, which is only counted.
async fn heavywork(State(state): State<ServiceState>) -> impl IntoResponse {
    state.counters.record_heavywork();
    (StatusCode::ACCEPTED, Json(Message::new("Heavy work started")))
}

async fn lightwork() -> impl IntoResponse {
    Json(Message::new("Light work done"))
}
