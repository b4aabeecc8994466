//! Formulary endpoints under `/api/genericos`

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use busca::{Filter, SearchQuery};
use catalogo::genericos::{self, FormularyEntry, Source};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::{non_blank, parse_flag, parse_limit, AppState};
use crate::error::{ApiError, ApiResult};
use crate::responses::{FormularyLinks, FormularyOverview, ResumoResponse, SearchResponse};

/// Query parameters for formulary search
#[derive(Debug, Default, Deserialize)]
pub struct FormularySearchParams {
    /// Free text
    pub q: Option<String>,

    /// Therapeutic group, compared without case or accents
    pub grupo: Option<String>,

    /// Free-availability flag
    pub gratuito: Option<String>,

    /// Result count
    pub limit: Option<String>,
}

impl FormularySearchParams {
    /// Engine query for these parameters
    pub fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(self.q.as_deref().unwrap_or_default())
            .with_optional_filter(non_blank(self.grupo.as_deref()).map(|g| Filter::equals("grupo", g)))
            .with_optional_filter(
                self.gratuito
                    .as_deref()
                    .map(|g| Filter::flag("gratuito", parse_flag(g))),
            );
        if let Some(limit) = parse_limit(self.limit.as_deref()) {
            query = query.with_limit(limit);
        }
        query
    }
}

fn find<'a>(state: &'a AppState, id: &str) -> ApiResult<&'a FormularyEntry> {
    state
        .catalogs
        .genericos
        .get(id)
        .ok_or_else(|| ApiError::not_found("Genérico não encontrado"))
}

/// GET /api/genericos/ - Overview
pub async fn overview(State(state): State<AppState>) -> Json<FormularyOverview> {
    let catalog = &state.catalogs.genericos;
    Json(FormularyOverview {
        total: catalog.len(),
        grupos: genericos::group_counts(catalog.iter()).into_keys().collect(),
        gratuito: genericos::FREE_NOTE,
        fontes: genericos::sources_by_key(),
    })
}

/// GET /api/genericos/grupos - Entry count per group
pub async fn groups(State(state): State<AppState>) -> Json<BTreeMap<String, usize>> {
    Json(genericos::group_counts(state.catalogs.genericos.iter()))
}

/// GET /api/genericos/search - Ranked search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<FormularySearchParams>,
) -> Json<SearchResponse<FormularyEntry>> {
    let query = params.to_query();
    let results = state.catalogs.genericos.search(&query);
    debug!("Formulary search: q='{}', {} results", query.text, results.len());
    Json(SearchResponse::from_ranked(results))
}

/// GET /api/genericos/sources - Official sources
pub async fn sources() -> Json<&'static [Source]> {
    Json(genericos::SOURCES)
}

/// GET /api/genericos/:id - One entry
pub async fn entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormularyEntry>> {
    find(&state, &id).cloned().map(Json)
}

/// GET /api/genericos/:id/links - Retailer search links
pub async fn links(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormularyLinks>> {
    let entry = find(&state, &id)?;
    Ok(Json(FormularyLinks {
        id: entry.id.clone(),
        dcb: entry.dcb.clone(),
        compra: entry.purchase_links(),
        aviso: genericos::LINKS_NOTICE,
    }))
}

/// GET /api/genericos/:id/resumo - Short summary
pub async fn resumo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ResumoResponse>> {
    let entry = find(&state, &id)?;
    Ok(Json(ResumoResponse {
        id: entry.id.clone(),
        resumo: entry.resumo(),
    }))
}

/// Formulary routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/genericos", get(overview))
        .route("/api/genericos/", get(overview))
        .route("/api/genericos/grupos", get(groups))
        .route("/api/genericos/search", get(search))
        .route("/api/genericos/sources", get(sources))
        .route("/api/genericos/:id", get(entry))
        .route("/api/genericos/:id/links", get(links))
        .route("/api/genericos/:id/resumo", get(resumo))
}
