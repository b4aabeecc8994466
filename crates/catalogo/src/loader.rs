// Dataset loading
//
// *O Carregamento* (The Loading) - Embedded JSON datasets, optionally replaced
// by files from a data directory

use crate::error::{Error, Result};
use busca::{Catalog, Record, Schema};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Formulary dataset shipped with the crate
pub const GENERICOS_JSON: &str = include_str!("../data/genericos.json");

/// Psychiatric formulary dataset shipped with the crate
pub const PSIQUIATRIA_JSON: &str = include_str!("../data/psiquiatria.json");

/// Bibliography dataset shipped with the crate
pub const REFERENCIAS_JSON: &str = include_str!("../data/referencias.json");

/// Parse a JSON array of records
pub fn parse_records<R: DeserializeOwned>(dataset: &'static str, json: &str) -> Result<Vec<R>> {
    serde_json::from_str(json).map_err(|source| Error::Json { dataset, source })
}

/// Parse records and build an immutable catalog
pub fn build_catalog<R>(dataset: &'static str, json: &str, schema: Schema) -> Result<Catalog<R>>
where
    R: Record + DeserializeOwned,
{
    let records = parse_records(dataset, json)?;
    let catalog =
        Catalog::new(records, schema).map_err(|source| Error::Catalog { dataset, source })?;
    info!("Loaded dataset '{}': {} records", dataset, catalog.len());
    Ok(catalog)
}

/// Dataset text: `<dir>/<file_name>` when it exists, else the embedded copy
pub fn read_dataset(
    dataset: &'static str,
    file_name: &str,
    embedded: &'static str,
    data_dir: Option<&Path>,
) -> Result<Cow<'static, str>> {
    let Some(dir) = data_dir else {
        return Ok(Cow::Borrowed(embedded));
    };

    let path = dir.join(file_name);
    if !path.is_file() {
        debug!(
            "No {} in {}, using embedded dataset '{}'",
            file_name,
            dir.display(),
            dataset
        );
        return Ok(Cow::Borrowed(embedded));
    }

    let text = std::fs::read_to_string(&path).map_err(|source| Error::Io {
        dataset,
        path: path.clone(),
        source,
    })?;
    info!("Reading dataset '{}' from {}", dataset, path.display());
    Ok(Cow::Owned(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genericos::FormularyEntry;
    use crate::referencias::Reference;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_datasets_parse() {
        let genericos: Vec<FormularyEntry> = parse_records("genericos", GENERICOS_JSON).unwrap();
        let referencias: Vec<Reference> = parse_records("referencias", REFERENCIAS_JSON).unwrap();
        assert!(!genericos.is_empty());
        assert!(!referencias.is_empty());
    }

    #[test]
    fn test_invalid_json_names_dataset() {
        let err = parse_records::<Reference>("referencias", "{not json").unwrap_err();
        assert!(matches!(err, Error::Json { dataset: "referencias", .. }));
        assert!(err.to_string().contains("referencias"));
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let json = r#"[
            {"id": "a", "category": "cientifica", "type": "book", "title": "A"},
            {"id": "a", "category": "cientifica", "type": "book", "title": "B"}
        ]"#;
        let err = build_catalog::<Reference>("referencias", json, crate::referencias::schema())
            .unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }

    #[test]
    fn test_read_dataset_prefers_directory_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("referencias.json"), "[]").unwrap();

        let text = read_dataset("referencias", "referencias.json", REFERENCIAS_JSON, Some(dir.path()))
            .unwrap();
        assert_eq!(text, "[]");

        let fallback = read_dataset("genericos", "genericos.json", GENERICOS_JSON, Some(dir.path()))
            .unwrap();
        assert_eq!(fallback, GENERICOS_JSON);

        let embedded = read_dataset("genericos", "genericos.json", GENERICOS_JSON, None).unwrap();
        assert!(matches!(embedded, Cow::Borrowed(_)));
    }
}
