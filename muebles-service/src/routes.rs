//! Route table

use axum::{routing::get, Router};

use crate::handlers::{fallback, muebles};
use crate::health::{health, readiness};
use crate::state::AppState;

/// Collection endpoint
pub const MUEBLES_PATH: &str = "/api/v1/muebles";

/// Single-resource endpoint
pub const MUEBLE_PATH: &str = "/api/v1/muebles/{codigo}";

/// Build the application router
///
/// Unknown paths, and known paths hit with a method they do not serve, fall
/// through to the HTML 404. Middleware layers are applied by
/// [`crate::server::Server`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(MUEBLES_PATH, get(muebles::list).post(muebles::create))
        .route(
            MUEBLE_PATH,
            get(muebles::get).put(muebles::update).delete(muebles::delete),
        )
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .with_state(state)
}
