// Query model
//
// *A Pergunta* (The Question) - Free text, structured filters and limit

use crate::normalize::normalize;
use crate::search::FieldValue;
use serde::{Deserialize, Serialize};

/// Structured filter applied before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Text equality after normalization on both sides
    Equals {
        /// Filtered field name
        field: String,
        /// Expected value
        value: String,
    },

    /// Boolean flag equality
    Flag {
        /// Filtered field name
        field: String,
        /// Expected flag
        value: bool,
    },

    /// Closed numeric interval, open on an absent bound
    Range {
        /// Filtered field name
        field: String,
        /// Inclusive lower bound
        min: Option<f64>,
        /// Inclusive upper bound
        max: Option<f64>,
    },
}

impl Filter {
    /// Category-style equality filter
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Boolean flag filter
    pub fn flag(field: impl Into<String>, value: bool) -> Self {
        Self::Flag {
            field: field.into(),
            value,
        }
    }

    /// Numeric range filter
    pub fn range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Name of the record field this filter reads
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::Flag { field, .. } | Self::Range { field, .. } => {
                field
            }
        }
    }

    /// Whether a record value satisfies the filter.
    ///
    /// A missing value never matches, and neither does a value of the wrong
    /// kind (a text where a number is expected, and so on).
    pub fn matches(&self, value: Option<FieldValue<'_>>) -> bool {
        let Some(value) = value else {
            return false;
        };

        match (self, value) {
            (Self::Equals { value: expected, .. }, FieldValue::Text(actual)) => {
                normalize(actual) == normalize(expected)
            }
            (Self::Flag { value: expected, .. }, FieldValue::Flag(actual)) => actual == *expected,
            (Self::Range { min, max, .. }, FieldValue::Number(actual)) => {
                if actual.is_nan() {
                    return false;
                }
                min.map_or(true, |lo| actual >= lo) && max.map_or(true, |hi| actual <= hi)
            }
            _ => false,
        }
    }
}

/// Search query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query text as typed by the user
    pub text: String,

    /// Structured filters, all of which must match
    pub filters: Vec<Filter>,

    /// Requested result count; non-positive or absent means "catalog default"
    pub limit: Option<i64>,
}

impl SearchQuery {
    /// Create a query from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a structured filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter only when one is present
    pub fn with_optional_filter(self, filter: Option<Filter>) -> Self {
        match filter {
            Some(filter) => self.with_filter(filter),
            None => self,
        }
    }

    /// Set the requested limit
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Normalized query tokens
    pub fn tokens(&self) -> Vec<String> {
        tokenize(&self.text)
    }

    /// Effective limit given a catalog default and hard cap
    pub fn effective_limit(&self, default_limit: usize, hard_cap: usize) -> usize {
        let requested = match self.limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(usize::MAX),
            _ => default_limit,
        };
        requested.min(hard_cap)
    }
}

/// Split normalized text into query tokens
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Sinvastatina  20 MG"), vec!["sinvastatina", "20", "mg"]);
        assert_eq!(tokenize("mg mg"), vec!["mg", "mg"]);
        assert!(tokenize("  ,;  ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[rstest]
    #[case(None, 25)]
    #[case(Some(0), 25)]
    #[case(Some(-4), 25)]
    #[case(Some(5), 5)]
    #[case(Some(300), 300)]
    #[case(Some(301), 300)]
    #[case(Some(i64::MAX), 300)]
    fn test_effective_limit(#[case] limit: Option<i64>, #[case] expected: usize) {
        let query = SearchQuery {
            limit,
            ..SearchQuery::new("x")
        };
        assert_eq!(query.effective_limit(25, 300), expected);
    }

    #[test]
    fn test_default_limit_is_also_capped() {
        let query = SearchQuery::new("");
        assert_eq!(query.effective_limit(500, 300), 300);
    }

    #[test]
    fn test_equals_filter_ignores_case_and_accents() {
        let filter = Filter::equals("componente", "basico");
        assert!(filter.matches(Some(FieldValue::Text("Básico"))));
        assert!(!filter.matches(Some(FieldValue::Text("Especializado"))));
        assert!(!filter.matches(None));
    }

    #[test]
    fn test_flag_filter() {
        let filter = Filter::flag("gratuito", true);
        assert!(filter.matches(Some(FieldValue::Flag(true))));
        assert!(!filter.matches(Some(FieldValue::Flag(false))));
        assert!(!filter.matches(None));
    }

    #[rstest]
    #[case(Some(1950.0), Some(2000.0), 1971.0, true)]
    #[case(Some(1950.0), Some(2000.0), 1950.0, true)]
    #[case(Some(1950.0), Some(2000.0), 2000.0, true)]
    #[case(Some(1950.0), Some(2000.0), 2001.0, false)]
    #[case(Some(1950.0), None, 2024.0, true)]
    #[case(None, Some(1950.0), 1913.0, true)]
    #[case(None, Some(1950.0), 1971.0, false)]
    #[case(None, None, 0.0, true)]
    fn test_range_filter(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] year: f64,
        #[case] expected: bool,
    ) {
        let filter = Filter::range("year", min, max);
        assert_eq!(filter.matches(Some(FieldValue::Number(year))), expected);
    }

    #[test]
    fn test_filter_kind_mismatch_never_matches() {
        assert!(!Filter::range("year", Some(1.0), None).matches(Some(FieldValue::Text("1999"))));
        assert!(!Filter::flag("x", true).matches(Some(FieldValue::Number(1.0))));
        assert!(!Filter::equals("x", "true").matches(Some(FieldValue::Flag(true))));
        assert!(!Filter::range("year", None, None).matches(None));
    }

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("fluoxetina")
            .with_filter(Filter::equals("componente", "Básico"))
            .with_optional_filter(None)
            .with_limit(10);

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].field(), "componente");
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.tokens(), vec!["fluoxetina"]);
    }
}
