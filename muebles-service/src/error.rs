//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Client message for a create/update body lacking a required field
pub const MSG_MISSING_DATA: &str = "Faltan datos relevantes";
/// Client message for a code that matches no stored resource
pub const MSG_NOT_FOUND: &str = "El código no corresponde a un mueble registrado";
/// Client message for any server-side failure
pub const MSG_SERVER_ERROR: &str = "Se ha generado un error en el servidor";
/// Client message for a price that is not a number
pub const MSG_INVALID_PRICE: &str = "El precio debe ser un número válido.";
/// Client message for a zero or negative price on update
pub const MSG_NON_POSITIVE_PRICE: &str = "El precio debe ser un número positivo.";

/// Request input rejected before touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `nombre`, `precio` or `categoria` absent or falsy
    #[error("{}", MSG_MISSING_DATA)]
    MissingData,

    /// `precio` present but not a finite number
    #[error("{}", MSG_INVALID_PRICE)]
    InvalidPrice,

    /// `precio` not strictly positive
    #[error("{}", MSG_NON_POSITIVE_PRICE)]
    NonPositivePrice,
}

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client input (400)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No resource with the requested code (400, not 404)
    #[error("Not found: codigo {code:?}")]
    NotFound {
        /// Requested code, `None` when the path segment was not an integer
        code: Option<i64>,
    },

    /// Structured store error with operation context
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Not-found error for `code`
    pub fn not_found(code: Option<i64>) -> Self {
        Self::NotFound { code }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotFound { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Error::Validation(e) => {
                tracing::debug!(error = %e, "Request rejected");
                e.to_string()
            }

            Error::NotFound { code } => {
                tracing::debug!(codigo = ?code, "Resource not found");
                MSG_NOT_FOUND.to_string()
            }

            Error::Store(ref e) => {
                // Internal detail stays server-side
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    collection = ?e.collection,
                    retriable = e.is_retriable(),
                    "Store error: {}", e.message
                );
                MSG_SERVER_ERROR.to_string()
            }

            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                MSG_SERVER_ERROR.to_string()
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                MSG_SERVER_ERROR.to_string()
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                MSG_SERVER_ERROR.to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreOperation;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::MissingData.to_string(), "Faltan datos relevantes");
        assert_eq!(
            ValidationError::InvalidPrice.to_string(),
            "El precio debe ser un número válido."
        );
        assert_eq!(
            ValidationError::NonPositivePrice.to_string(),
            "El precio debe ser un número positivo."
        );
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let response = Error::from(ValidationError::MissingData).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.message, MSG_MISSING_DATA);
    }

    #[tokio::test]
    async fn test_not_found_is_bad_request() {
        let response = Error::not_found(Some(42)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.message, MSG_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_error_is_opaque() {
        let err = StoreError::connection_failed(StoreOperation::Find, "socket closed on 10.0.0.3");
        let response = Error::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.message, MSG_SERVER_ERROR);
        assert!(!body.message.contains("10.0.0.3"));
    }

    #[tokio::test]
    async fn test_internal_error_is_opaque() {
        let response = Error::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.message, MSG_SERVER_ERROR);
    }
}
