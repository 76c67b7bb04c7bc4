// src/fixture.rs
// =============================================================================
// Local HTTP server for tests (compiled only under #[cfg(test)]).
//
//   /fast   200 "fast response\n" right away
//   /slow   200 "slow response\n" after 5 seconds
//   /error  500 "something went wrong\n" right away
//
// Every test gets its own server on an ephemeral port, so tests can run in
// parallel and never touch the network.
// =============================================================================

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const SLOW_DELAY: Duration = Duration::from_secs(5);

pub struct FixtureServer {
    addr: SocketAddr,
}

impl FixtureServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn() -> FixtureServer {
    let app = Router::new()
        .route("/fast", get(|| async { "fast response\n" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(SLOW_DELAY).await;
                "slow response\n"
            }),
        )
        .route(
            "/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "something went wrong\n") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FixtureServer { addr }
}

/// A URL on a local port with nothing listening.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/fast", addr)
}
