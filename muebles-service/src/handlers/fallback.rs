//! Unmatched route handler

use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
};

/// HTML body returned for unknown paths
pub const NOT_FOUND_HTML: &str =
    "<h1>Error 404</h1><h3>La URL indicada no existe en este servidor</h3>";

/// Terminal 404 for any path no route matched
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route matched");
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}
