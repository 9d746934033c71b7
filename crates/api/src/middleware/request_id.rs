//! Request ID middleware for request tracing and correlation.
//!
//! Reuses the ID from an upstream proxy (e.g., a load balancer) when one is
//! supplied, otherwise generates a UUID v4. The ID is recorded in the request
//! span and the Sentry scope, and echoed back in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID we accept before generating our own.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the inbound ID if it is usable, otherwise generate one.
fn resolve(inbound: Option<&HeaderValue>) -> String {
    inbound
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
