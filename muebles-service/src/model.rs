//! Furniture resource model
//!
//! Field names are the wire names of the public API (`codigo`, `nombre`,
//! `precio`, `categoria`) and double as document field names in the store.

use serde::{Deserialize, Serialize, Serializer};

use crate::coercion::MAX_SAFE_INTEGER;
use crate::store::{Document, StoreError, StoreOperation, StoreResult};

/// Name of the collection holding furniture documents
pub const COLLECTION: &str = "muebles";

/// Document field holding the resource code
pub const FIELD_CODE: &str = "codigo";
/// Document field holding the name
pub const FIELD_NAME: &str = "nombre";
/// Document field holding the price
pub const FIELD_PRICE: &str = "precio";
/// Document field holding the category
pub const FIELD_CATEGORY: &str = "categoria";

/// A furniture item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mueble {
    /// Server-assigned unique code, immutable after creation
    pub codigo: i64,
    /// Display name
    pub nombre: String,
    /// Unit price, always finite
    #[serde(serialize_with = "serialize_price")]
    pub precio: f64,
    /// Category, matched case-insensitively on list queries
    pub categoria: String,
}

impl Mueble {
    /// Encode as a store document
    pub fn to_document(&self, operation: StoreOperation) -> StoreResult<Document> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::serialization(
                operation,
                format!("resource encoded as non-object: {}", other),
            )),
            Err(e) => Err(StoreError::serialization(operation, e.to_string())),
        }
    }
}

/// Integral prices go out as JSON integers (`150`, not `150.0`)
fn serialize_price<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if price.fract() == 0.0 && price.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}
