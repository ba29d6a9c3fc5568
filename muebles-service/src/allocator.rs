//! Resource code allocation
//!
//! New codes are `max(existing codigo) + 1`, or `1` for an empty collection.
//! Reading the maximum and inserting the new document are two separate store
//! round-trips with no lock between them, so two concurrent creates can be
//! handed the same code. Callers accept that window.

use serde_json::Value;

use crate::model::FIELD_CODE;
use crate::store::{
    Collection, Filter, FindOptions, SortSpec, StoreError, StoreErrorKind, StoreOperation,
    StoreResult,
};

/// Code given to the first resource of an empty collection
pub const FIRST_CODE: i64 = 1;

/// Next free code in `collection`
pub async fn next_code(collection: &dyn Collection) -> StoreResult<i64> {
    // the range filter only matches numeric codes
    let top = collection
        .find(
            &Filter::gte(FIELD_CODE, f64::NEG_INFINITY),
            FindOptions::default()
                .sort(SortSpec::descending(FIELD_CODE))
                .limit(1),
        )
        .await?;

    let max = top
        .first()
        .and_then(|doc| doc.get(FIELD_CODE))
        .and_then(integral_code);

    let code = match max {
        None => FIRST_CODE,
        Some(max) => max.checked_add(1).ok_or_else(|| {
            StoreError::new(
                StoreOperation::Find,
                StoreErrorKind::Other,
                format!("no code left above {}", max),
            )
            .with_collection(collection.name())
        })?,
    };

    tracing::debug!(collection = collection.name(), codigo = code, "Allocated code");
    Ok(code)
}

// Integers are read exactly; fractional codes round down
fn integral_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|n| n.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, DocumentStore, MemoryStore};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    #[tokio::test]
    async fn test_empty_collection_starts_at_one() {
        let store = MemoryStore::new();
        let coll = store.connect("muebles").await.unwrap();
        assert_eq!(next_code(coll.as_ref()).await.unwrap(), 1);
        coll.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_next_code_is_above_maximum() {
        let store = MemoryStore::with_documents(
            "muebles",
            vec![
                doc(json!({"codigo": 4})),
                doc(json!({"codigo": 17})),
                doc(json!({"codigo": 9})),
            ],
        )
        .await;
        let coll = store.connect("muebles").await.unwrap();
        assert_eq!(next_code(coll.as_ref()).await.unwrap(), 18);
        coll.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_non_numeric_codes_are_ignored() {
        let store = MemoryStore::with_documents(
            "muebles",
            vec![doc(json!({"codigo": "zz"})), doc(json!({"codigo": 2}))],
        )
        .await;
        let coll = store.connect("muebles").await.unwrap();
        assert_eq!(next_code(coll.as_ref()).await.unwrap(), 3);
        coll.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_large_codes_are_read_exactly() {
        let store = MemoryStore::with_documents(
            "muebles",
            vec![
                doc(json!({"codigo": 9_007_199_254_740_993_i64})),
                doc(json!({"codigo": 9_007_199_254_740_992_i64})),
                doc(json!({"codigo": 5})),
            ],
        )
        .await;
        let coll = store.connect("muebles").await.unwrap();
        assert_eq!(
            next_code(coll.as_ref()).await.unwrap(),
            9_007_199_254_740_994
        );
        coll.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_exhausted_code_space_is_store_error() {
        let store =
            MemoryStore::with_documents("muebles", vec![doc(json!({"codigo": i64::MAX}))]).await;
        let coll = store.connect("muebles").await.unwrap();
        let err = next_code(coll.as_ref()).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Other);
        assert_eq!(err.collection.as_deref(), Some("muebles"));
        coll.disconnect().await.unwrap();
    }
}
