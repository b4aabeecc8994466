// busca - Catalog Search & Ranking
//
// *A Busca* (The Search) - Normalized keyword search with weighted fields and
// deterministic ordering over read-only catalogs

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Keyword search over immutable record catalogs.

/// Canonical comparison form for text
pub mod normalize;

/// Query value object and structured filters
pub mod query;

/// Field weights, scoring and candidate ordering
pub mod ranking;

/// Catalog construction and the search entry point
pub mod search;

pub use normalize::{normalize, normalize_all};
pub use query::{tokenize, Filter, SearchQuery};
pub use ranking::{FieldSpec, Schema};
pub use search::{Catalog, Error, FieldValue, Record};
