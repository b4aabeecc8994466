//! Bibliography endpoints under `/api/referencias`

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use busca::{Filter, SearchQuery};
use catalogo::referencias::{self, Category, FlatReference, Reference};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{non_blank, parse_limit, AppState};
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    BibliographyOverview, CategoryCitations, CategoryTotal, CitationResponse, SearchResponse,
};

/// Query parameters for bibliography search
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSearchParams {
    /// Free text
    pub query: Option<String>,

    /// Category; unknown names are ignored
    pub category: Option<String>,

    /// Earliest publication year, inclusive
    pub year_from: Option<String>,

    /// Latest publication year, inclusive
    pub year_to: Option<String>,

    /// Result count
    pub limit: Option<String>,
}

fn parse_year(name: &str, raw: Option<&str>) -> ApiResult<Option<f64>> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|y| y.is_finite())
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("{name} deve ser numérico: {value}"))),
    }
}

impl ReferenceSearchParams {
    /// Engine query for these parameters; fails on a non-numeric year
    pub fn to_query(&self) -> ApiResult<SearchQuery> {
        let year_from = parse_year("yearFrom", self.year_from.as_deref())?;
        let year_to = parse_year("yearTo", self.year_to.as_deref())?;

        let category = self
            .category
            .as_deref()
            .and_then(|c| c.parse::<Category>().ok());
        let years = (year_from.is_some() || year_to.is_some())
            .then(|| Filter::range("year", year_from, year_to));

        let mut query = SearchQuery::new(self.query.as_deref().unwrap_or_default())
            .with_optional_filter(category.map(|c| Filter::equals("category", c.as_str())))
            .with_optional_filter(years);
        if let Some(limit) = parse_limit(self.limit.as_deref()) {
            query = query.with_limit(limit);
        }
        Ok(query)
    }
}

fn find<'a>(state: &'a AppState, id: &str) -> ApiResult<&'a Reference> {
    state
        .catalogs
        .referencias
        .get(id)
        .ok_or_else(|| ApiError::not_found("Referência não encontrada"))
}

fn pretty_json<T: Serialize>(value: &T) -> ApiResult<Response> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize dump: {}", e)))?;
    Ok(([(header::CONTENT_TYPE, "application/json; charset=utf-8")], body).into_response())
}

/// GET /api/referencias/ - Totals per category
pub async fn overview(State(state): State<AppState>) -> Json<BibliographyOverview> {
    let catalog = &state.catalogs.referencias;
    let categorias = referencias::by_category(catalog.iter())
        .into_iter()
        .map(|(category, refs)| (category, CategoryTotal { total: refs.len() }))
        .collect();
    Json(BibliographyOverview {
        categorias,
        total: catalog.len(),
    })
}

/// GET /api/referencias/search - Ranked search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ReferenceSearchParams>,
) -> ApiResult<Json<SearchResponse<Reference>>> {
    let query = params.to_query()?;
    let results = state.catalogs.referencias.search(&query);
    debug!("Reference search: q='{}', {} results", query.text, results.len());
    Ok(Json(SearchResponse::from_ranked(results)))
}

/// GET /api/referencias/json - Dump grouped by category
pub async fn dump(State(state): State<AppState>) -> ApiResult<Response> {
    pretty_json(&referencias::by_category(state.catalogs.referencias.iter()))
}

/// GET /api/referencias/json/flat - Flat dump with sort keys
pub async fn dump_flat(State(state): State<AppState>) -> ApiResult<Response> {
    let flat: Vec<FlatReference<'_>> = state
        .catalogs
        .referencias
        .iter()
        .map(FlatReference::from)
        .collect();
    pretty_json(&flat)
}

/// GET /api/referencias/strings/:cat - Citations of one category
pub async fn category_strings(
    State(state): State<AppState>,
    Path(cat): Path<String>,
) -> ApiResult<Json<CategoryCitations>> {
    let category: Category = cat
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Categoria inválida: {cat}")))?;
    let citations: Vec<String> = state
        .catalogs
        .referencias
        .iter()
        .filter(|r| r.category == category)
        .map(Reference::citation)
        .collect();
    Ok(Json(CategoryCitations {
        categoria: category,
        total: citations.len(),
        referencias: citations,
    }))
}

/// GET /api/referencias/:id - One reference
pub async fn entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Reference>> {
    find(&state, &id).cloned().map(Json)
}

/// GET /api/referencias/:id/citation - APA citation
pub async fn citation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CitationResponse>> {
    let reference = find(&state, &id)?;
    Ok(Json(CitationResponse {
        id: reference.id.clone(),
        citation: reference.citation(),
    }))
}

/// Bibliography routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/referencias", get(overview))
        .route("/api/referencias/", get(overview))
        .route("/api/referencias/search", get(search))
        .route("/api/referencias/json", get(dump))
        .route("/api/referencias/json/flat", get(dump_flat))
        .route("/api/referencias/strings/:cat", get(category_strings))
        .route("/api/referencias/:id", get(entry))
        .route("/api/referencias/:id/citation", get(citation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(category: Option<&str>, from: Option<&str>, to: Option<&str>) -> ReferenceSearchParams {
        ReferenceSearchParams {
            category: category.map(str::to_string),
            year_from: from.map(str::to_string),
            year_to: to.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dumps_are_pretty_json() {
        let state = AppState::new(
            catalogo::Catalogs::embedded().unwrap(),
            crate::config::ServerConfig::default(),
        );

        let response = dump_flat(State(state.clone())).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("[\n"));
        let flat: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(flat.as_array().unwrap().len(), state.catalogs.referencias.len());

        let response = dump(State(state)).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let grouped: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(grouped["fenomenologica"].is_array());
    }

    #[test]
    fn test_category_and_years() {
        let query = params(Some("cientifica"), Some("2000"), None).to_query().unwrap();
        assert_eq!(
            query.filters,
            vec![
                Filter::equals("category", "cientifica"),
                Filter::range("year", Some(2000.0), None)
            ]
        );
    }

    #[test]
    fn test_unknown_category_is_ignored() {
        let query = params(Some("Cientifica"), None, None).to_query().unwrap();
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        let err = params(None, Some("ontem"), None).to_query().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(params(None, None, Some("NaN")).to_query().is_err());
        assert!(params(None, Some(" "), None).to_query().unwrap().filters.is_empty());
    }
}
