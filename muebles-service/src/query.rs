//! List query translation
//!
//! Turns the list endpoint's query string into one store query. Filters do not
//! combine: [`STRATEGIES`] is walked top to bottom and the first strategy whose
//! parameter is present decides both the filter and the ordering.
//!
//! | parameter    | filter                                  | order          |
//! |--------------|-----------------------------------------|----------------|
//! | `categoria`  | case-insensitive regex on `categoria`   | `nombre` asc   |
//! | `precio_gte` | `precio >= n`                           | `precio` asc   |
//! | `precio_lte` | `precio <= n`                           | `precio` desc  |
//! | (none)       | everything                              | natural        |

use serde::Deserialize;

use crate::coercion::parse_number;
use crate::model::{FIELD_CATEGORY, FIELD_NAME, FIELD_PRICE};
use crate::store::{Filter, FindOptions, SortSpec};

/// Query string accepted by the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// Category pattern
    pub categoria: Option<String>,
    /// Lower price bound (inclusive)
    pub precio_gte: Option<String>,
    /// Upper price bound (inclusive)
    pub precio_lte: Option<String>,
}

/// One way of answering a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStrategy {
    /// Match by category, ordered by name
    ByCategory,
    /// Price floor, cheapest first
    MinPrice,
    /// Price ceiling, most expensive first
    MaxPrice,
    /// Everything in natural order
    Everything,
}

/// Strategies in precedence order
pub const STRATEGIES: [ListStrategy; 4] = [
    ListStrategy::ByCategory,
    ListStrategy::MinPrice,
    ListStrategy::MaxPrice,
    ListStrategy::Everything,
];

/// Resolved store query
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan {
    /// Strategy that produced this plan
    pub strategy: ListStrategy,
    /// Document filter
    pub filter: Filter,
    /// Ordering
    pub options: FindOptions,
}

impl ListStrategy {
    /// The query parameter this strategy reads, if any
    fn parameter<'q>(&self, query: &'q ListQuery) -> Option<&'q str> {
        let value = match self {
            Self::ByCategory => query.categoria.as_deref(),
            Self::MinPrice => query.precio_gte.as_deref(),
            Self::MaxPrice => query.precio_lte.as_deref(),
            Self::Everything => return Some(""),
        };
        // empty parameters count as not given
        value.filter(|v| !v.is_empty())
    }

    fn plan(self, value: &str) -> ListPlan {
        let (filter, options) = match self {
            Self::ByCategory => (
                Filter::regex_ci(FIELD_CATEGORY, value),
                FindOptions::default().sort(SortSpec::ascending(FIELD_NAME)),
            ),
            Self::MinPrice => (
                Filter::gte(FIELD_PRICE, parse_number(value)),
                FindOptions::default().sort(SortSpec::ascending(FIELD_PRICE)),
            ),
            Self::MaxPrice => (
                Filter::lte(FIELD_PRICE, parse_number(value)),
                FindOptions::default().sort(SortSpec::descending(FIELD_PRICE)),
            ),
            Self::Everything => (Filter::All, FindOptions::default()),
        };
        ListPlan {
            strategy: self,
            filter,
            options,
        }
    }
}

impl ListQuery {
    /// Build from raw query-string pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "categoria" => &mut query.categoria,
                "precio_gte" => &mut query.precio_gte,
                "precio_lte" => &mut query.precio_lte,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Pick the first applicable strategy
    pub fn plan(&self) -> ListPlan {
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy.parameter(self).map(|v| strategy.plan(v)))
            .unwrap_or_else(|| ListStrategy::Everything.plan(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(categoria: Option<&str>, gte: Option<&str>, lte: Option<&str>) -> ListQuery {
        ListQuery {
            categoria: categoria.map(str::to_string),
            precio_gte: gte.map(str::to_string),
            precio_lte: lte.map(str::to_string),
        }
    }

    #[test]
    fn test_no_parameters_lists_everything() {
        let plan = ListQuery::default().plan();
        assert_eq!(plan.strategy, ListStrategy::Everything);
        assert_eq!(plan.filter, Filter::All);
        assert_eq!(plan.options, FindOptions::default());
    }

    #[test]
    fn test_category_wins_over_prices() {
        let plan = query(Some("silla"), Some("100"), Some("500")).plan();
        assert_eq!(plan.strategy, ListStrategy::ByCategory);
        assert_eq!(plan.filter, Filter::regex_ci("categoria", "silla"));
        assert_eq!(plan.options.sort, Some(SortSpec::ascending("nombre")));
    }

    #[test]
    fn test_min_price_wins_over_max_price() {
        let plan = query(None, Some("100"), Some("500")).plan();
        assert_eq!(plan.strategy, ListStrategy::MinPrice);
        assert_eq!(plan.filter, Filter::gte("precio", 100.0));
        assert_eq!(plan.options.sort, Some(SortSpec::ascending("precio")));
    }

    #[test]
    fn test_max_price_sorts_descending() {
        let plan = query(None, None, Some("250.5")).plan();
        assert_eq!(plan.strategy, ListStrategy::MaxPrice);
        assert_eq!(plan.filter, Filter::lte("precio", 250.5));
        assert_eq!(plan.options.sort, Some(SortSpec::descending("precio")));
    }

    #[test]
    fn test_empty_parameter_is_skipped() {
        let plan = query(Some(""), Some("10"), None).plan();
        assert_eq!(plan.strategy, ListStrategy::MinPrice);
    }

    #[test]
    fn test_from_pairs_keeps_first_occurrence() {
        let parsed = ListQuery::from_pairs([
            ("precio_gte", "1"),
            ("precio_gte", "2"),
            ("orden", "x"),
            ("categoria", "mesa"),
            ("categoria", "silla"),
        ]);
        assert_eq!(parsed, query(Some("mesa"), Some("1"), None));
    }

    #[test]
    fn test_strategy_order_is_fixed() {
        assert_eq!(
            STRATEGIES,
            [
                ListStrategy::ByCategory,
                ListStrategy::MinPrice,
                ListStrategy::MaxPrice,
                ListStrategy::Everything,
            ]
        );
    }
}
