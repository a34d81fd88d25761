//! Logger set-up and request logging.
use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use env_logger::Env;
use log::info;

/// Logs at `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Logs the method, URI, response status and latency of each request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} in {:?}",
        method,
        uri,
        response.status(),
        started.elapsed()
    );
    response
}
