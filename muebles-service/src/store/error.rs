//! Store error types
//!
//! Structured errors raised by document store backends. Handlers never show
//! these to clients; they are logged and surfaced as an opaque 500.
//!
//! # Example
//!
//! ```rust
//! use muebles_service::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::query_failed(StoreOperation::Find, "bad regex")
//!     .with_collection("muebles");
//! assert!(matches!(error.kind, StoreErrorKind::QueryFailed));
//! assert!(!error.is_retriable());
//! ```

use std::fmt;

/// Store operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Opening a collection handle
    Connect,
    /// Releasing a collection handle
    Disconnect,
    /// Looking up a single document
    FindOne,
    /// Querying many documents
    Find,
    /// Inserting a document
    InsertOne,
    /// Replacing fields of a document
    UpdateOne,
    /// Removing a document
    DeleteOne,
    /// Liveness check against the backend
    Ping,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Disconnect => write!(f, "disconnect"),
            Self::FindOne => write!(f, "find_one"),
            Self::Find => write!(f, "find"),
            Self::InsertOne => write!(f, "insert_one"),
            Self::UpdateOne => write!(f, "update_one"),
            Self::DeleteOne => write!(f, "delete_one"),
            Self::Ping => write!(f, "ping"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Failed to reach the backend
    ConnectionFailed,
    /// The query itself was rejected (bad filter, bad pattern)
    QueryFailed,
    /// A stored document could not be encoded or decoded
    Serialization,
    /// Operation timed out
    Timeout,
    /// Other/unknown error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Serialization => write!(f, "serialization"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message (server side only)
    pub message: String,
    /// The collection involved, when known
    pub collection: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            collection: None,
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::ConnectionFailed, message)
    }

    /// Create a query failed error
    pub fn query_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::QueryFailed, message)
    }

    /// Create a serialization error
    pub fn serialization(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Serialization, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Timeout, message)
    }

    /// Attach the collection name
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref collection) = self.collection {
            write!(f, " [collection: {}]", collection)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
