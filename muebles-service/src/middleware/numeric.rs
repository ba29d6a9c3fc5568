//! Numeric field coercion for resource requests
//!
//! [`NumericFields`] is an extractor that runs before every handler taking a
//! `codigo` path segment or a `precio` body field. It reads the body (JSON or
//! urlencoded form), rejects a provided `precio` that is not a finite number
//! with `400`, and hands the handler an immutable value holding the coerced
//! `codigo`, the coerced `precio` and the raw body fields.
//!
//! ```rust,ignore
//! async fn update(fields: NumericFields) -> Result<impl IntoResponse> {
//!     let draft = fields.draft()?;
//!     // ...
//! }
//! ```

use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, FromRequest, FromRequestParts, RawPathParams, Request},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form,
};
use serde_json::Value;

use crate::coercion::{is_truthy, to_code, to_number};
use crate::error::{Error, ValidationError};
use crate::model::{FIELD_CATEGORY, FIELD_CODE, FIELD_NAME, FIELD_PRICE};
use crate::store::Document;

/// Coerced request input
#[derive(Debug, Clone, PartialEq)]
pub struct NumericFields {
    codigo: Option<i64>,
    precio: Option<f64>,
    body: Document,
}

/// Body fields required to create or replace a resource
#[derive(Debug, Clone, PartialEq)]
pub struct MuebleDraft {
    /// Display name
    pub nombre: String,
    /// Coerced price
    pub precio: f64,
    /// Category
    pub categoria: String,
}

impl NumericFields {
    /// Build from a path segment (if the route has one) and a parsed body.
    ///
    /// Fails when the body carries a truthy `precio` with no finite numeric
    /// reading.
    pub fn from_parts(codigo: Option<&str>, body: Document) -> Result<Self, ValidationError> {
        let precio = match body.get(FIELD_PRICE) {
            Some(raw) if is_truthy(raw) => {
                let n = to_number(raw);
                if !n.is_finite() {
                    return Err(ValidationError::InvalidPrice);
                }
                Some(n)
            }
            _ => None,
        };

        Ok(Self {
            codigo: codigo.and_then(to_code),
            precio,
            body,
        })
    }

    /// Code from the path; `None` when absent or not an integer
    pub fn codigo(&self) -> Option<i64> {
        self.codigo
    }

    /// Coerced price; `None` when the body did not provide one
    pub fn precio(&self) -> Option<f64> {
        self.precio
    }

    /// Raw body fields
    pub fn body(&self) -> &Document {
        &self.body
    }

    /// Require `nombre`, `precio` and `categoria`
    pub fn draft(&self) -> Result<MuebleDraft, ValidationError> {
        let nombre = self.text_field(FIELD_NAME);
        let categoria = self.text_field(FIELD_CATEGORY);
        match (nombre, self.precio, categoria) {
            (Some(nombre), Some(precio), Some(categoria)) => Ok(MuebleDraft {
                nombre,
                precio,
                categoria,
            }),
            _ => Err(ValidationError::MissingData),
        }
    }

    fn text_field(&self, field: &str) -> Option<String> {
        match self.body.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl MuebleDraft {
    /// Reject zero and negative prices
    pub fn require_positive_price(self) -> Result<Self, ValidationError> {
        if self.precio > 0.0 {
            Ok(self)
        } else {
            Err(ValidationError::NonPositivePrice)
        }
    }
}

impl<S> FromRequest<S> for NumericFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let codigo = RawPathParams::from_request_parts(&mut parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(name, _)| *name == FIELD_CODE)
                    .map(|(_, value)| value.to_string())
            });

        let kind = BodyKind::from_headers(&parts.headers);
        let req = Request::from_parts(parts, body);
        let document = match kind {
            BodyKind::Form => match Form::<Vec<(String, String)>>::from_request(req, state).await {
                Ok(Form(pairs)) => pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
                Err(FormRejection::BytesRejection(rejection)) => {
                    return Err(rejection.into_response())
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring malformed form body");
                    Document::new()
                }
            },
            BodyKind::Json | BodyKind::Other => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                kind.parse(&bytes)
            }
        };

        Self::from_parts(codigo.as_deref(), document).map_err(|e| {
            tracing::debug!(error = %e, "Numeric field rejected");
            Error::from(e).into_response()
        })
    }
}

/// Body encodings the service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return Self::Other;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime == "application/json" || mime.ends_with("+json") {
            Self::Json
        } else if mime == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }

    // Unparseable or non-object JSON reads as empty; forms go through `Form`
    fn parse(self, bytes: &Bytes) -> Document {
        if bytes.is_empty() {
            return Document::new();
        }
        match self {
            Self::Json => match serde_json::from_slice::<Value>(bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => Document::new(),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring malformed JSON body");
                    Document::new()
                }
            },
            Self::Form | Self::Other => Document::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn body(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test bodies must be objects"),
        }
    }

    #[test]
    fn test_string_price_is_coerced() {
        let fields = NumericFields::from_parts(
            None,
            body(json!({"nombre": "Mesa", "precio": "150", "categoria": "Comedor"})),
        )
        .unwrap();
        assert_eq!(fields.precio(), Some(150.0));
        let draft = fields.draft().unwrap();
        assert_eq!(draft.nombre, "Mesa");
        assert_eq!(draft.precio, 150.0);
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let err = NumericFields::from_parts(None, body(json!({"precio": "caro"}))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);
        let err = NumericFields::from_parts(None, body(json!({"precio": "Infinity"}))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);
        let err = NumericFields::from_parts(None, body(json!({"precio": {"a": 1}}))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);
    }

    #[test]
    fn test_falsy_price_counts_as_absent() {
        for raw in [json!(0), json!(""), json!(null), json!(false)] {
            let fields = NumericFields::from_parts(None, body(json!({"precio": raw}))).unwrap();
            assert_eq!(fields.precio(), None);
        }
    }

    #[test]
    fn test_missing_fields() {
        let fields =
            NumericFields::from_parts(None, body(json!({"nombre": "Mesa", "precio": 10}))).unwrap();
        assert_eq!(fields.draft().unwrap_err(), ValidationError::MissingData);

        let fields = NumericFields::from_parts(
            None,
            body(json!({"nombre": "", "precio": 10, "categoria": "Comedor"})),
        )
        .unwrap();
        assert_eq!(fields.draft().unwrap_err(), ValidationError::MissingData);
    }

    #[test]
    fn test_positive_price_rule() {
        let draft = MuebleDraft {
            nombre: "Mesa".to_string(),
            precio: -5.0,
            categoria: "Comedor".to_string(),
        };
        assert_eq!(
            draft.require_positive_price().unwrap_err(),
            ValidationError::NonPositivePrice
        );
    }

    #[test]
    fn test_code_coercion() {
        let fields = NumericFields::from_parts(Some("12"), Document::new()).unwrap();
        assert_eq!(fields.codigo(), Some(12));
        let fields = NumericFields::from_parts(Some("doce"), Document::new()).unwrap();
        assert_eq!(fields.codigo(), None);
    }

    #[test]
    fn test_body_kind_from_content_type() {
        let mut headers = HeaderMap::new();
        assert_eq!(BodyKind::from_headers(&headers), BodyKind::Other);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(BodyKind::from_headers(&headers), BodyKind::Json);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert_eq!(BodyKind::from_headers(&headers), BodyKind::Form);
    }

    #[test]
    fn test_malformed_json_reads_as_empty() {
        let doc = BodyKind::Json.parse(&Bytes::from_static(b"{not json"));
        assert!(doc.is_empty());
        let doc = BodyKind::Json.parse(&Bytes::from_static(b"[1,2]"));
        assert!(doc.is_empty());
    }
}
