use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use crate::endpoints;
use crate::state::ServiceState;
use crate::web::middleware;

/// All endpoints wrapped in the target's middleware.
pub fn router(state: ServiceState) -> Router {
    // Outermost first: panics anywhere below become 500s that still carry the `Server` header.
    let layers = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(middleware::set_server_header())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::make_http_span)
                .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        );

    endpoints::routes().layer(layers).with_state(state)
}

/// Serves requests from `listener` until `shutdown` resolves.
///
/// Connections that are open at that point are allowed to finish their current request.
pub async fn serve<F>(listener: TcpListener, state: ServiceState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
