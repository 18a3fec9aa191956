use axum::response::IntoResponse;
use axum::{Json, Router, routing};

use crate::endpoints::Message;
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new().route("/up", routing::get(up))
}

async fn up() -> impl IntoResponse {
    Json(Message::new("App running"))
}
