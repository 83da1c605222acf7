//! Correlation ID middleware.
//!
//! Takes the correlation ID from the `x-correlation-id` request header, or
//! generates one, and exposes it to handlers as a [`Context`] extension.
//! The ID is echoed on the response.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::logger::context::{new_correlation_id, Context};

pub const X_CORRELATION_ID: &str = "x-correlation-id";

pub async fn correlation_middleware(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(X_CORRELATION_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(new_correlation_id);

    req.extensions_mut()
        .insert(Context::new().with_correlation_id(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_CORRELATION_ID, value);
    }
    response
}
