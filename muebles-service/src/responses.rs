//! Success response bodies
//!
//! Every successful reply is a JSON object carrying a `payload`, a `message`,
//! or both:
//!
//! - `200 {payload}` for reads
//! - `201 {message, payload}` for creation
//! - `200 {message, payload}` for updates
//! - `200 {message}` for deletion
//!
//! # Example
//!
//! ```rust
//! use muebles_service::responses::{Created, Success};
//!
//! let read = Success::new(vec![1, 2, 3]);
//! let deleted = Success::<()>::message("Registro eliminado");
//! let created = Created::new("Registro creado", 7).with_location("/api/v1/muebles/7");
//! # let _ = (read, deleted, created);
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Client message for a created resource
pub const MSG_CREATED: &str = "Registro creado";
/// Client message for an updated resource
pub const MSG_UPDATED: &str = "Registro actualizado";
/// Client message for a deleted resource
pub const MSG_DELETED: &str = "Registro eliminado";

/// HTTP 200 OK response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Success<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
}

impl<T> Success<T> {
    /// `{payload}` body
    pub fn new(payload: T) -> Self {
        Self {
            message: None,
            payload: Some(payload),
        }
    }

    /// `{message}` body without payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            payload: None,
        }
    }

    /// Add a message next to the payload
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// HTTP 201 Created response
///
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    message: String,
    payload: T,
    location: Option<String>,
}

#[derive(Serialize)]
struct CreatedBody<'a, T> {
    message: &'a str,
    payload: &'a T,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            payload,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let body = CreatedBody {
            message: &self.message,
            payload: &self.payload,
        };
        let mut response = (StatusCode::CREATED, Json(&body)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}
