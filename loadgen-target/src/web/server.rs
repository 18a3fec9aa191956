use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::state::State;
use crate::web::app;

/// Listens on the configured address and serves until SIGINT or SIGTERM.
pub async fn server(config: Config) -> Result<()> {
    let addr = config.http_addr;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to listen on {addr}"))?;
    tracing::info!(%addr, "target listening");

    let shutdown = elegant_departure::get_shutdown_guard().wait_owned();
    let serving = tokio::spawn(app::serve(listener, State::new(), shutdown));

    elegant_departure::tokio::depart()
        .on_termination()
        .on_sigint()
        .await;
    tracing::info!("target stopped");

    serving.await?
}
