//! Security response headers.
//!
//! # Responsibilities
//! - Append a fixed set of security headers to every outgoing
//!   response, error responses included
//!
//! # Design Decisions
//! - No branching: the set is static and applies unconditionally, so
//!   the invariant survives whatever the inner handlers do
//! - Installed as the outermost middleware layer so even middleware
//!   rejections (timeouts, malformed bodies) carry the set

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// The fixed header set. Names are lowercase so they can be used as
/// static header names.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("content-security-policy", "default-src 'self'"),
];

/// Middleware appending [`SECURITY_HEADERS`] to every response.
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}
