// Weighted field scoring

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weight used for searchable fields declared without one
pub const DEFAULT_WEIGHT: u32 = 1;

/// Default number of results when the caller does not ask for a count
pub const DEFAULT_LIMIT: usize = 100;

/// Default upper bound on any result list
pub const DEFAULT_HARD_CAP: usize = 300;

/// A searchable field and the score it awards per matching token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Record field name
    pub name: String,

    /// Points added once per query token found in the field
    pub weight: u32,
}

/// Declarative scoring table for one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Searchable fields, in declaration order
    pub fields: Vec<FieldSpec>,

    /// Limit used when the query has none
    pub default_limit: usize,

    /// Maximum result length regardless of the requested limit
    pub hard_cap: usize,
}

impl Schema {
    /// Create an empty schema with the default limits
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            default_limit: DEFAULT_LIMIT,
            hard_cap: DEFAULT_HARD_CAP,
        }
    }

    /// Declare a searchable field with the default weight
    pub fn field(self, name: impl Into<String>) -> Self {
        self.weighted_field(name, DEFAULT_WEIGHT)
    }

    /// Declare a searchable field with an explicit weight.
    ///
    /// A zero weight is raised to [`DEFAULT_WEIGHT`] so that every declared
    /// field can contribute to the score.
    pub fn weighted_field(mut self, name: impl Into<String>, weight: u32) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            weight: weight.max(DEFAULT_WEIGHT),
        });
        self
    }

    /// Set the default and maximum result counts
    pub fn with_limits(mut self, default_limit: usize, hard_cap: usize) -> Self {
        self.default_limit = default_limit.max(1);
        self.hard_cap = hard_cap.max(1);
        self
    }

    /// Weight of a declared field, or the default weight
    pub fn weight_of(&self, name: &str) -> u32 {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map_or(DEFAULT_WEIGHT, |f| f.weight)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

/// Score normalized field texts against query tokens.
///
/// `fields` pairs each normalized text with its weight. Every (token, field)
/// pair where the token is a substring of the field adds the field weight
/// once, however many times the token occurs.
pub fn score_fields<'a, I>(fields: I, tokens: &[String]) -> u32
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut score = 0u32;
    for (text, weight) in fields {
        for token in tokens {
            if text.contains(token.as_str()) {
                score = score.saturating_add(weight);
            }
        }
    }
    score
}

/// Transient ranking candidate
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a, T> {
    /// Candidate payload
    pub item: &'a T,

    /// Precomputed sort key of the candidate
    pub sort_key: &'a str,

    /// Accumulated score
    pub score: u32,
}

/// Order candidates by score descending, then sort key ascending
pub fn compare_candidates<T>(a: &ScoredCandidate<'_, T>, b: &ScoredCandidate<'_, T>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.sort_key.cmp(b.sort_key))
}

/// Sort candidates in place; ties beyond the sort key keep input order
pub fn rank<T>(candidates: &mut [ScoredCandidate<'_, T>]) {
    candidates.sort_by(compare_candidates);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_schema_builder() {
        let schema = Schema::new()
            .weighted_field("title", 5)
            .weighted_field("authors", 4)
            .field("notes")
            .with_limits(50, 200);

        assert_eq!(schema.fields.len(), 3);
        assert_eq!(schema.weight_of("title"), 5);
        assert_eq!(schema.weight_of("notes"), 1);
        assert_eq!(schema.weight_of("undeclared"), DEFAULT_WEIGHT);
        assert_eq!(schema.default_limit, 50);
        assert_eq!(schema.hard_cap, 200);
    }

    #[test]
    fn test_zero_weight_is_raised() {
        let schema = Schema::new().weighted_field("x", 0);
        assert_eq!(schema.weight_of("x"), 1);
    }

    #[test]
    fn test_score_counts_each_token_field_pair_once() {
        let fields = [("mg mg mg sinvastatina 20 mg", 1)];
        assert_eq!(score_fields(fields, &tokens(&["mg"])), 1);
        assert_eq!(score_fields(fields, &tokens(&["mg", "20"])), 2);
    }

    #[test]
    fn test_score_uses_substring_containment_and_weights() {
        let fields = [
            ("psicopatologia geral", 5),
            ("jaspers karl", 4),
            ("fenomenologia psicopatologia", 3),
        ];
        assert_eq!(score_fields(fields, &tokens(&["psicopato"])), 8);
        assert_eq!(score_fields(fields, &tokens(&["jasp"])), 4);
        assert_eq!(score_fields(fields, &tokens(&["xyz"])), 0);
        assert_eq!(score_fields(fields, &tokens(&[])), 0);
    }

    #[test]
    fn test_rank_orders_by_score_then_sort_key() {
        let items = ["c", "a", "b", "d"];
        let mut candidates = vec![
            ScoredCandidate { item: &items[0], sort_key: "captopril 25 mg", score: 2 },
            ScoredCandidate { item: &items[1], sort_key: "anlodipino 5 mg", score: 2 },
            ScoredCandidate { item: &items[2], sort_key: "zzz", score: 7 },
            ScoredCandidate { item: &items[3], sort_key: "aaa", score: 1 },
        ];

        rank(&mut candidates);

        let order: Vec<&str> = candidates.iter().map(|c| *c.item).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_rank_is_stable_for_full_ties() {
        let items = ["first", "second", "third"];
        let mut candidates: Vec<_> = items
            .iter()
            .map(|item| ScoredCandidate { item, sort_key: "same", score: 3 })
            .collect();

        rank(&mut candidates);

        let order: Vec<&str> = candidates.iter().map(|c| *c.item).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }
}
