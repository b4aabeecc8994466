// catalogo - Reference Catalogs
//
// *O Catálogo* (The Catalog) - Formulary, psychiatric formulary and
// bibliography datasets built once into searchable catalogs

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Typed reference datasets on top of the `busca` search engine.

/// APA citation formatting
pub mod apa;

/// Catalog loading errors
pub mod error;

/// Generic drug formulary
pub mod genericos;

/// Dataset parsing and loading
pub mod loader;

/// Psychotropic generics
pub mod psiquiatria;

/// Bibliography
pub mod referencias;

pub use error::{Error, Result};
pub use genericos::FormularyEntry;
pub use psiquiatria::PsychEntry;
pub use referencias::{Category, Reference, ReferenceKind};

use busca::Catalog;
use std::path::Path;

/// The three catalogs served by the application
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// Generic drug formulary
    pub genericos: Catalog<FormularyEntry>,

    /// Psychotropic generics
    pub psiquiatria: Catalog<PsychEntry>,

    /// Bibliography
    pub referencias: Catalog<Reference>,
}

impl Catalogs {
    /// Build every catalog from the embedded datasets
    pub fn embedded() -> Result<Self> {
        Self::load(None)
    }

    /// Build every catalog, taking dataset files from `data_dir` when present
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let genericos_json = loader::read_dataset(
            genericos::DATASET,
            "genericos.json",
            loader::GENERICOS_JSON,
            data_dir,
        )?;
        let psiquiatria_json = loader::read_dataset(
            psiquiatria::DATASET,
            "psiquiatria.json",
            loader::PSIQUIATRIA_JSON,
            data_dir,
        )?;
        let referencias_json = loader::read_dataset(
            referencias::DATASET,
            "referencias.json",
            loader::REFERENCIAS_JSON,
            data_dir,
        )?;

        Ok(Self {
            genericos: loader::build_catalog(
                genericos::DATASET,
                &genericos_json,
                genericos::schema(),
            )?,
            psiquiatria: loader::build_catalog(
                psiquiatria::DATASET,
                &psiquiatria_json,
                psiquiatria::schema(),
            )?,
            referencias: loader::build_catalog(
                referencias::DATASET,
                &referencias_json,
                referencias::schema(),
            )?,
        })
    }

    /// Total record count across catalogs
    pub fn total(&self) -> usize {
        self.genericos.len() + self.psiquiatria.len() + self.referencias.len()
    }
}
