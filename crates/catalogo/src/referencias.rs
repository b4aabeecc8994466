// Bibliography catalog
//
// *A Estante* (The Bookshelf) - Phenomenological, scientific and integrative
// references for clinical discussion

use busca::{normalize, FieldValue, Record, Schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Dataset name used in logs and errors
pub const DATASET: &str = "referencias";

/// Reference category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Classical phenomenological psychiatry
    Fenomenologica,
    /// Guidelines, classifications and textbooks
    Cientifica,
    /// Works bridging phenomenology and empirical research
    Integrativa,
}

impl Category {
    /// All categories, in presentation order
    pub const ALL: [Category; 3] = [Self::Fenomenologica, Self::Cientifica, Self::Integrativa];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fenomenologica => "fenomenologica",
            Self::Cientifica => "cientifica",
            Self::Integrativa => "integrativa",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown reference category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact, case-sensitive match on the wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Kind of publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Book
    Book,
    /// Clinical guideline
    Guideline,
    /// Diagnostic classification
    Classification,
    /// Journal article
    Article,
    /// Book chapter
    Chapter,
    /// Editorial
    Editorial,
}

impl ReferenceKind {
    /// Whether APA renders the title in italics
    pub fn italic_title(&self) -> bool {
        matches!(self, Self::Book | Self::Classification | Self::Guideline)
    }
}

/// One bibliographic reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Stable identifier
    pub id: String,

    /// Category
    pub category: Category,

    /// Publication kind
    #[serde(rename = "type")]
    pub kind: ReferenceKind,

    /// Authors as "Last, Given"
    #[serde(default)]
    pub authors: Vec<String>,

    /// Editors as "Last, Given"
    #[serde(default)]
    pub editors: Vec<String>,

    /// Institutional author
    #[serde(default)]
    pub corporate_author: Option<String>,

    /// Other contributors
    #[serde(default)]
    pub contributors: Vec<String>,

    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,

    /// Title
    pub title: String,

    /// ISO language code
    #[serde(default)]
    pub language: String,

    /// Journal, or the containing work for chapters
    #[serde(default)]
    pub journal: Option<String>,

    /// Publisher
    #[serde(default)]
    pub publisher: Option<String>,

    /// Place of publication
    #[serde(default)]
    pub city: Option<String>,

    /// Edition number
    #[serde(default)]
    pub edition: Option<String>,

    /// Volume
    #[serde(default)]
    pub volume: Option<String>,

    /// Issue
    #[serde(default)]
    pub issue: Option<String>,

    /// Page range
    #[serde(default)]
    pub pages: Option<String>,

    /// DOI without resolver prefix
    #[serde(default)]
    pub doi: Option<String>,

    /// ISBN
    #[serde(default)]
    pub isbn: Option<String>,

    /// URL, empty when none
    #[serde(default)]
    pub url: String,

    /// Keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for Reference {
    fn id(&self) -> &str {
        &self.id
    }

    /// First author, else the corporate author, else the first editor
    fn primary_text(&self) -> Cow<'_, str> {
        let name = self
            .authors
            .first()
            .map(String::as_str)
            .or(self.corporate_author.as_deref())
            .or(self.editors.first().map(String::as_str))
            .unwrap_or("");
        Cow::Borrowed(name)
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(&self.title)),
            "authors" => Some(FieldValue::List(&self.authors)),
            "journal" => self.journal.as_deref().map(FieldValue::Text),
            "keywords" => Some(FieldValue::List(&self.keywords)),
            "publisher" => self.publisher.as_deref().map(FieldValue::Text),
            "notes" => self.notes.as_deref().map(FieldValue::Text),
            "category" => Some(FieldValue::Text(self.category.as_str())),
            "year" => self.year.map(|y| FieldValue::Number(f64::from(y))),
            _ => None,
        }
    }
}

impl Reference {
    /// Normalized first-author sort key
    pub fn first_author_sort(&self) -> String {
        normalize(&self.primary_text())
    }

    /// APA-style citation string
    pub fn citation(&self) -> String {
        crate::apa::format_citation(self)
    }
}

/// Flat dump row: the reference plus its sort key
#[derive(Debug, Serialize)]
pub struct FlatReference<'a> {
    /// The reference
    #[serde(flatten)]
    pub reference: &'a Reference,

    /// Normalized first-author sort key
    pub first_author_sort: String,
}

impl<'a> From<&'a Reference> for FlatReference<'a> {
    fn from(reference: &'a Reference) -> Self {
        Self {
            first_author_sort: reference.first_author_sort(),
            reference,
        }
    }
}

/// Scoring table: title 5, authors 4, journal and keywords 3, publisher 2, notes 1
pub fn schema() -> Schema {
    Schema::new()
        .weighted_field("title", 5)
        .weighted_field("authors", 4)
        .weighted_field("journal", 3)
        .weighted_field("keywords", 3)
        .weighted_field("publisher", 2)
        .field("notes")
        .with_limits(50, 200)
}

/// References grouped by category, every category present
pub fn by_category<'a>(
    references: impl IntoIterator<Item = &'a Reference>,
) -> BTreeMap<Category, Vec<&'a Reference>> {
    let mut groups: BTreeMap<Category, Vec<&'a Reference>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
    for reference in references {
        groups.entry(reference.category).or_default().push(reference);
    }
    groups
}
