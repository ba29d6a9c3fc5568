//! # muebles-service
//!
//! REST resource service for a furniture inventory held in a document store.
//!
//! ## Endpoints
//!
//! | Method | Path                       | Success                  |
//! |--------|----------------------------|--------------------------|
//! | GET    | `/api/v1/muebles`          | 200 `{payload: [...]}`   |
//! | GET    | `/api/v1/muebles/{codigo}` | 200 `{payload}`          |
//! | POST   | `/api/v1/muebles`          | 201 `{message, payload}` |
//! | PUT    | `/api/v1/muebles/{codigo}` | 200 `{message, payload}` |
//! | DELETE | `/api/v1/muebles/{codigo}` | 200 `{message}`          |
//!
//! Invalid input and unknown codes answer 400 with `{message}`; store
//! failures answer an opaque 500; unknown paths answer an HTML 404.
//!
//! ## Example
//!
//! ```rust,no_run
//! use muebles_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder().config(config.clone()).build().await?;
//!     let app = router(state);
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod allocator;
pub mod coercion;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod model;
pub mod observability;
pub mod query;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, MiddlewareConfig, ServiceConfig, StoreConfig};
    pub use crate::envelope::with_collection;
    pub use crate::error::{Error, ErrorResponse, Result, ValidationError};
    pub use crate::health::{health, readiness};
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer, MuebleDraft,
        NumericFields, SENSITIVE_HEADERS,
    };
    pub use crate::model::Mueble;
    pub use crate::observability::init_tracing;
    pub use crate::query::{ListPlan, ListQuery, ListStrategy};
    pub use crate::responses::{Created, Success};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::store::{
        Collection, Document, DocumentStore, Filter, FindOptions, MemoryStore, SortSpec,
        StoreError, StoreErrorKind, StoreOperation,
    };

    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}
