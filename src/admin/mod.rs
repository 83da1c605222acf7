//! Runtime log-level endpoint.
//!
//! `GET /loglevel` reports the current level as `{"level":"info"}`.
//! `PUT` or `POST` changes it for every handle sharing the logger.

pub mod handlers;

use std::io;
use std::net::SocketAddr;
use std::thread;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use self::handlers::*;
use crate::http::correlation_middleware;
use crate::logger::Logger;

pub const LEVEL_ROUTE: &str = "/loglevel";

pub fn level_router(logger: Logger) -> Router {
    Router::new()
        .route(
            LEVEL_ROUTE,
            get(get_level)
                .put(set_level)
                .post(set_level)
                .fallback(method_not_allowed),
        )
        .with_state(LevelState { logger })
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Serve the level endpoint on an already bound listener until it fails.
pub async fn serve_level_endpoint(listener: TcpListener, logger: Logger) -> io::Result<()> {
    axum::serve(listener, level_router(logger)).await
}

/// Bind `addr` and serve the level endpoint on a background thread.
///
/// Binding happens on the calling thread so the error is returned here;
/// serving errors after that are reported on the logger's error output.
pub fn spawn_level_endpoint(addr: SocketAddr, logger: Logger) -> io::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;
    let bound = listener.local_addr()?;

    thread::Builder::new()
        .name("loglevel-endpoint".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    logger.report_error("level endpoint runtime", &e);
                    return;
                }
            };
            runtime.block_on(async move {
                let result = match TcpListener::from_std(listener) {
                    Ok(listener) => serve_level_endpoint(listener, logger.clone()).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    logger.report_error("level endpoint", &e);
                }
            });
        })?;

    Ok(bound)
}
