use std::any::Any;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower_http::set_header::SetResponseHeaderLayer;

const SERVER: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Stamps every response with `Server: loadgen-target/<version>`.
pub fn set_server_header() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::SERVER, HeaderValue::from_static(SERVER))
}

/// Request span carrying method, URI and, when known, the peer address.
pub fn make_http_span(request: &Request) -> tracing::Span {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    tracing::debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        peer = peer.map(tracing::field::display),
    )
}

/// Turns a handler panic into a `500` with the panic message as body.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => panic
            .downcast_ref::<&str>()
            .map_or("handler panicked", |message| *message)
            .to_owned(),
    };

    tracing::error!(%message, "panic in request handler");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_internal_server_errors() {
        let panics: [Box<dyn Any + Send>; 3] = [
            Box::new("static message"),
            Box::new(String::from("formatted message")),
            Box::new(42),
        ];
        for panic in panics {
            let response = handle_panic(panic);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn server_header_names_the_crate() {
        assert!(SERVER.starts_with("loadgen-target/"));
    }
}
