//! An in-process target server for integration tests.
//!
//! ```
//! use loadgen_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = TestServer::new().await;
//!     let response = reqwest::Client::new()
//!         .post(server.url("/heavywork"))
//!         .send()
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(response.status(), 202);
//!     assert_eq!(server.state().counters.heavywork(), 1);
//! }
//! ```

use std::net::SocketAddr;

use loadgen_target::state::{ServiceState, State};
use loadgen_target::web;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A target server on a random local port, stopped when dropped.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    state: ServiceState,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Binds a fresh server with zeroed counters.
    pub async fn new() -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = State::new();

        let serving = web::serve(listener, state.clone(), std::future::pending());
        let task = tokio::spawn(async move { serving.await.unwrap() });

        Self { addr, state, task }
    }

    /// URL of `path` on this server, using `localhost` as host.
    pub fn url(&self, path: &str) -> String {
        format!("http://localhost:{}/{}", self.port(), path.trim_start_matches('/'))
    }

    /// The port the server listens on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Request counters of the running server.
    pub fn state(&self) -> &ServiceState {
        &self.state
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
