//! Lightweight admin HTTP server spawner
//!
//! Exposes `/healthz` and `/metrics` on a separate port, away from the `/v1` API.

use std::thread;
use axum::{routing::get, Router};
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

async fn metrics_handler(f: fn() -> (StatusCode, String)) -> (StatusCode, String) {
    f()
}

pub fn admin_router(metrics_fn: fn() -> (StatusCode, String)) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || metrics_handler(metrics_fn)))
}

/// Spawn an admin HTTP server on its own thread and runtime.
/// Bind or serve failures are logged; they never take the API down.
pub fn spawn_admin_server(addr: &str, metrics_fn: fn() -> (StatusCode, String)) {
    let addr = addr.to_string();
    thread::spawn(move || {
        let rt = match Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "build admin runtime failed");
                return;
            }
        };
        rt.block_on(async move {
            let listener = match TcpListener::bind(&addr).await {
                Ok(l) => l,
                Err(e) => {
                    error!(%addr, error = %e, "bind admin failed");
                    return;
                }
            };
            info!(%addr, "admin server listening");
            if let Err(e) = axum::serve(listener, admin_router(metrics_fn)).await {
                error!(error = %e, "serve admin failed");
            }
        });
    });
}
