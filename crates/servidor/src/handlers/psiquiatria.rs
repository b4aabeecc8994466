//! Psychiatric formulary endpoints under `/api/psiq`

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use busca::{Filter, SearchQuery};
use catalogo::psiquiatria::{self, PsychEntry};
use serde::Deserialize;
use tracing::debug;

use super::{non_blank, parse_flag, parse_limit, AppState};
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    PsychGroups, PsychLinks, PsychOverview, PsychSources, PsychTotals, ResumoResponse,
    SearchResponse, SourceLink,
};

/// Query parameters for psychiatric search
#[derive(Debug, Default, Deserialize)]
pub struct PsychSearchParams {
    /// Free text
    pub q: Option<String>,

    /// Supply component, compared without case or accents
    pub componente: Option<String>,

    /// Special-control flag
    pub controlado: Option<String>,

    /// Result count
    pub limit: Option<String>,
}

impl PsychSearchParams {
    /// Engine query for these parameters
    pub fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(self.q.as_deref().unwrap_or_default())
            .with_optional_filter(
                non_blank(self.componente.as_deref()).map(|c| Filter::equals("componente", c)),
            )
            .with_optional_filter(
                self.controlado
                    .as_deref()
                    .map(|c| Filter::flag("controlado", parse_flag(c))),
            );
        if let Some(limit) = parse_limit(self.limit.as_deref()) {
            query = query.with_limit(limit);
        }
        query
    }
}

fn source_links() -> Vec<SourceLink> {
    psiquiatria::SOURCES
        .iter()
        .map(|&(nome, url)| SourceLink { nome, url })
        .collect()
}

fn find<'a>(state: &'a AppState, id: &str) -> ApiResult<&'a PsychEntry> {
    state
        .catalogs
        .psiquiatria
        .get(id)
        .ok_or_else(|| ApiError::not_found("Psicofármaco não encontrado"))
}

/// GET /api/psiq/ - Overview
pub async fn overview(State(state): State<AppState>) -> Json<PsychOverview> {
    let catalog = &state.catalogs.psiquiatria;
    Json(PsychOverview {
        escopo: psiquiatria::SCOPE,
        totais: PsychTotals {
            total: catalog.len(),
            por_componente: psiquiatria::totals_by_component(catalog.iter()),
        },
        observacoes: psiquiatria::NOTES,
        fontes: source_links(),
    })
}

/// GET /api/psiq/grupos - Entry ids per component
pub async fn groups(State(state): State<AppState>) -> Json<PsychGroups> {
    Json(PsychGroups {
        grupos: psiquiatria::ids_by_component(state.catalogs.psiquiatria.iter()),
    })
}

/// GET /api/psiq/search - Ranked search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PsychSearchParams>,
) -> Json<SearchResponse<PsychEntry>> {
    let query = params.to_query();
    let results = state.catalogs.psiquiatria.search(&query);
    debug!("Psych search: q='{}', {} results", query.text, results.len());
    Json(SearchResponse::from_ranked(results))
}

/// GET /api/psiq/sources - Official sources
pub async fn sources() -> Json<PsychSources> {
    Json(PsychSources {
        fontes: source_links(),
    })
}

/// GET /api/psiq/:id - One entry
pub async fn entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PsychEntry>> {
    find(&state, &id).cloned().map(Json)
}

/// GET /api/psiq/:id/links - Retailer search links
pub async fn links(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PsychLinks>> {
    let entry = find(&state, &id)?;
    Ok(Json(PsychLinks {
        id: entry.id.clone(),
        dcb: entry.dcb.clone(),
        links: entry.purchase_links(),
    }))
}

/// GET /api/psiq/:id/resumo - Short summary
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

/// Psychiatric formulary routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/psiq", get(overview))
        .route("/api/psiq/", get(overview))
        .route("/api/psiq/grupos", get(groups))
        .route("/api/psiq/search", get(search))
        .route("/api/psiq/sources", get(sources))
        .route("/api/psiq/:id", get(entry))
        .route("/api/psiq/:id/links", get(links))
        .route("/api/psiq/:id/resumo", get(resumo))
}
