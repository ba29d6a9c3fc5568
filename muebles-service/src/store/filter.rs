//! Filter and sort specifications for document queries
//!
//! A [`Filter`] selects documents and a [`SortSpec`] orders them, mirroring the
//! query documents a document database accepts (`{field: value}`,
//! `{field: {$regex, $options}}`, `{field: {$gte}}`, `{field: {$lte}}`).
//!
//! # Example
//!
//! ```rust
//! use muebles_service::store::{Filter, FindOptions, SortSpec};
//!
//! let filter = Filter::regex_ci("categoria", "silla");
//! let options = FindOptions::default().sort(SortSpec::ascending("nombre"));
//! assert!(options.sort.is_some());
//! # let _ = filter;
//! ```

use std::cmp::Ordering;
use std::fmt;

use regex::RegexBuilder;
use serde_json::{Map, Value};

use super::error::{StoreError, StoreOperation, StoreResult};

/// A stored document: a JSON object keyed by field name
pub type Document = Map<String, Value>;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "1"),
            Self::Descending => write!(f, "-1"),
        }
    }
}

/// Single-field sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to order by
    pub field: String,
    /// Ordering direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Order ascending by `field`
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Order descending by `field`
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Compare two documents under this specification
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: {}}}", self.field, self.direction)
    }
}

/// Options applied to a multi-document query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Ordering; `None` keeps the store's natural order
    pub sort: Option<SortSpec>,
    /// Maximum number of documents to return
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Set the ordering
    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Cap the number of returned documents
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Document selection criteria
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals value (numbers compare numerically)
    Eq(String, Value),
    /// String field matches a regular expression
    Regex {
        /// Field to test
        field: String,
        /// Regular expression source
        pattern: String,
        /// Match ignoring case
        case_insensitive: bool,
    },
    /// Numeric field is greater than or equal to the bound
    Gte(String, f64),
    /// Numeric field is less than or equal to the bound
    Lte(String, f64),
}

impl Filter {
    /// Equality on `field`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Case-insensitive regular expression on `field`
    pub fn regex_ci(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Regex {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// `field >= bound`
    pub fn gte(field: impl Into<String>, bound: f64) -> Self {
        Self::Gte(field.into(), bound)
    }

    /// `field <= bound`
    pub fn lte(field: impl Into<String>, bound: f64) -> Self {
        Self::Lte(field.into(), bound)
    }

    /// Compile this filter into a predicate over documents.
    ///
    /// Fails when a regular expression does not compile.
    pub fn compile(&self, operation: StoreOperation) -> StoreResult<Matcher> {
        let matcher = match self {
            Self::All => Matcher::All,
            Self::Eq(field, value) => Matcher::Eq(field.clone(), value.clone()),
            Self::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|e| StoreError::query_failed(operation, e.to_string()))?;
                Matcher::Regex(field.clone(), regex)
            }
            Self::Gte(field, bound) => Matcher::Gte(field.clone(), *bound),
            Self::Lte(field, bound) => Matcher::Lte(field.clone(), *bound),
        };
        Ok(matcher)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{{}}"),
            Self::Eq(field, value) => write!(f, "{{{}: {}}}", field, value),
            Self::Regex {
                field,
                pattern,
                case_insensitive,
            } => write!(
                f,
                "{{{}: {{$regex: {:?}, $options: {:?}}}}}",
                field,
                pattern,
                if *case_insensitive { "i" } else { "" }
            ),
            Self::Gte(field, bound) => write!(f, "{{{}: {{$gte: {}}}}}", field, bound),
            Self::Lte(field, bound) => write!(f, "{{{}: {{$lte: {}}}}}", field, bound),
        }
    }
}

/// A compiled [`Filter`]
#[derive(Debug, Clone)]
pub enum Matcher {
    All,
    Eq(String, Value),
    Regex(String, regex::Regex),
    Gte(String, f64),
    Lte(String, f64),
}

impl Matcher {
    /// Whether `doc` satisfies the filter
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, expected) => doc
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected)),
            Self::Regex(field, regex) => doc
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| regex.is_match(s)),
            Self::Gte(field, bound) => doc
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|n| n >= *bound),
            Self::Lte(field, bound) => doc
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|n| n <= *bound),
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

// Missing/null < numbers < strings < everything else
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(_) => 3,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            // integers compare exactly, beyond f64 precision
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x.cmp(&y);
            }
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let matcher = Filter::regex_ci("categoria", "silla")
            .compile(StoreOperation::Find)
            .unwrap();
        assert!(matcher.matches(&doc(json!({"categoria": "Sillas de comedor"}))));
        assert!(matcher.matches(&doc(json!({"categoria": "SILLA"}))));
        assert!(!matcher.matches(&doc(json!({"categoria": "Mesa"}))));
        assert!(!matcher.matches(&doc(json!({"categoria": 12}))));
    }

    #[test]
    fn test_invalid_regex_is_query_error() {
        let err = Filter::regex_ci("categoria", "(")
            .compile(StoreOperation::Find)
            .unwrap_err();
        assert_eq!(err.kind, super::super::StoreErrorKind::QueryFailed);
    }

    #[test]
    fn test_lookaround_pattern_is_query_error() {
        for pattern in ["sill(?=a)", "(s)\\1"] {
            let err = Filter::regex_ci("categoria", pattern)
                .compile(StoreOperation::Find)
                .unwrap_err();
            assert_eq!(err.kind, super::super::StoreErrorKind::QueryFailed);
        }
    }

    #[test]
    fn test_numeric_equality_ignores_representation() {
        let matcher = Filter::eq("codigo", 3).compile(StoreOperation::FindOne).unwrap();
        assert!(matcher.matches(&doc(json!({"codigo": 3.0}))));
        assert!(!matcher.matches(&doc(json!({"codigo": 4}))));
        assert!(!matcher.matches(&doc(json!({"nombre": "x"}))));
    }

    #[test]
    fn test_large_integers_stay_distinct() {
        let matcher = Filter::eq("codigo", 9_007_199_254_740_993_i64)
            .compile(StoreOperation::FindOne)
            .unwrap();
        assert!(!matcher.matches(&doc(json!({"codigo": 9_007_199_254_740_992_i64}))));

        let a = doc(json!({"codigo": 9_007_199_254_740_993_i64}));
        let b = doc(json!({"codigo": 9_007_199_254_740_992_i64}));
        assert_eq!(SortSpec::ascending("codigo").compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let gte = Filter::gte("precio", 100.0).compile(StoreOperation::Find).unwrap();
        let lte = Filter::lte("precio", 100.0).compile(StoreOperation::Find).unwrap();
        let at = doc(json!({"precio": 100}));
        assert!(gte.matches(&at));
        assert!(lte.matches(&at));
        assert!(!gte.matches(&doc(json!({"precio": 99.5}))));
        assert!(!lte.matches(&doc(json!({"precio": 100.5}))));
    }

    #[test]
    fn test_nan_bound_matches_nothing() {
        let gte = Filter::gte("precio", f64::NAN).compile(StoreOperation::Find).unwrap();
        assert!(!gte.matches(&doc(json!({"precio": 10}))));
    }

    #[test]
    fn test_sort_spec_orders_by_field() {
        let a = doc(json!({"nombre": "Armario", "precio": 300}));
        let b = doc(json!({"nombre": "Banco", "precio": 50}));
        assert_eq!(SortSpec::ascending("nombre").compare(&a, &b), Ordering::Less);
        assert_eq!(SortSpec::descending("precio").compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::All.to_string(), "{}");
        assert_eq!(Filter::gte("precio", 10.0).to_string(), "{precio: {$gte: 10}}");
        assert_eq!(SortSpec::descending("precio").to_string(), "{precio: -1}");
    }
}
