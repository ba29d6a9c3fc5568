//! Request tracking middleware
//!
//! Every response carries an `x-request-id` (generated when the client did not
//! send one) and credential headers are masked in trace output.

use axum::http::HeaderName;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Create a request ID layer that assigns a UUID to requests lacking one
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
