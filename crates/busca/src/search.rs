// Core search engine implementation

use crate::normalize::{normalize, normalize_all};
use crate::query::SearchQuery;
use crate::ranking::{rank, score_fields, Schema, ScoredCandidate};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// Borrowed view of one record field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Single text value
    Text(&'a str),

    /// List of texts, searched as one space-joined text
    List(&'a [String]),

    /// Numeric value, used by range filters
    Number(f64),

    /// Boolean flag
    Flag(bool),
}

impl FieldValue<'_> {
    /// Normalized searchable text of the value
    pub fn normalized_text(&self) -> String {
        match self {
            Self::Text(text) => normalize(text),
            Self::List(items) => normalize_all(items),
            Self::Number(n) => normalize(&n.to_string()),
            Self::Flag(_) => String::new(),
        }
    }
}

/// Capability shared by every catalog record type
pub trait Record {
    /// Unique, stable identifier
    fn id(&self) -> &str;

    /// Text the sort key is derived from (primary compound, first author...)
    fn primary_text(&self) -> Cow<'_, str>;

    /// Look up a field by name; `None` when absent
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Catalog entry with its precomputed comparison data
#[derive(Debug, Clone)]
struct Entry<R> {
    record: R,
    sort_key: String,
    /// Normalized text per schema field, in schema order
    searchable: Vec<String>,
}

/// Immutable, pre-sorted collection of records for one dataset
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    entries: Vec<Entry<R>>,
    schema: Schema,
}

impl<R: Record> Catalog<R> {
    /// Build a catalog, computing sort keys and normalized field text once.
    ///
    /// Entries are kept in ascending sort-key order; equal keys keep their
    /// input order.
    pub fn new(records: Vec<R>, schema: Schema) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id().to_string()) {
                return Err(Error::DuplicateId(record.id().to_string()));
            }
        }

        let mut entries: Vec<Entry<R>> = records
            .into_iter()
            .map(|record| {
                let sort_key = normalize(&record.primary_text());
                let searchable = schema
                    .fields
                    .iter()
                    .map(|spec| {
                        record
                            .field(&spec.name)
                            .map(|value| value.normalized_text())
                            .unwrap_or_default()
                    })
                    .collect();
                Entry {
                    record,
                    sort_key,
                    searchable,
                }
            })
            .collect();

        entries.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

        debug!(
            "Catalog built: {} records, {} searchable fields",
            entries.len(),
            schema.fields.len()
        );

        Ok(Self { entries, schema })
    }

    /// Execute a search query.
    ///
    /// Filters first, then scores when the query has tokens (dropping
    /// zero-score records), orders by score and sort key, and truncates to
    /// the effective limit. Scores are not part of the result.
    pub fn search(&self, query: &SearchQuery) -> Vec<&R> {
        let tokens = query.tokens();
        let limit = query.effective_limit(self.schema.default_limit, self.schema.hard_cap);

        let pool = self.entries.iter().filter(|entry| {
            query
                .filters
                .iter()
                .all(|filter| filter.matches(entry.record.field(filter.field())))
        });

        if tokens.is_empty() {
            // Entries are already in sort-key order
            return pool.take(limit).map(|entry| &entry.record).collect();
        }

        let mut candidates: Vec<ScoredCandidate<'_, R>> = pool
            .filter_map(|entry| {
                let fields = entry
                    .searchable
                    .iter()
                    .zip(&self.schema.fields)
                    .map(|(text, spec)| (text.as_str(), spec.weight));
                let score = score_fields(fields, &tokens);
                (score > 0).then_some(ScoredCandidate {
                    item: &entry.record,
                    sort_key: &entry.sort_key,
                    score,
                })
            })
            .collect();

        rank(&mut candidates);

        candidates
            .into_iter()
            .take(limit)
            .map(|candidate| candidate.item)
            .collect()
    }

    /// Find a record by identifier
    pub fn get(&self, id: &str) -> Option<&R> {
        self.entries
            .iter()
            .find(|entry| entry.record.id() == id)
            .map(|entry| &entry.record)
    }

    /// All records in sort-key order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Sort key of a record, if it belongs to this catalog
    pub fn sort_key(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.record.id() == id)
            .map(|entry| entry.sort_key.as_str())
    }

    /// Scoring table in use
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two records share an identifier
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),
}
