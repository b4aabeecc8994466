//! HTTP handlers for REST API endpoints

use axum::{extract::State, routing::get, Json, Router};
use catalogo::Catalogs;
use chrono::Utc;
use conversa::{AnthropicClient, Discussion};
use sessao::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::responses::{CatalogSizes, StatusResponse};

/// Formulary routes
pub mod genericos;

/// Psychiatric formulary routes
pub mod psiquiatria;

/// Bibliography routes
pub mod referencias;

/// Discussion session routes
pub mod sessions;

/// State shared across all handlers
///
/// Catalogs and config are immutable after startup; the session store is
/// internally synchronized.
#[derive(Clone)]
pub struct AppState {
    /// Reference catalogs
    pub catalogs: Arc<Catalogs>,

    /// Discussion sessions
    pub sessions: SessionStore,

    /// Chat turns; absent when no backend is configured
    pub discussion: Option<Discussion>,

    /// Immutable server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State without a chat backend
    pub fn new(catalogs: Catalogs, config: ServerConfig) -> Self {
        Self {
            catalogs: Arc::new(catalogs),
            sessions: SessionStore::new(),
            discussion: None,
            config: Arc::new(config),
        }
    }

    /// Attach a chat backend
    #[must_use]
    pub fn with_discussion(mut self, discussion: Discussion) -> Self {
        self.discussion = Some(discussion);
        self
    }

    /// Load catalogs and the chat backend described by `config`
    pub fn from_config(config: ServerConfig) -> ApiResult<Self> {
        let catalogs = Catalogs::load(config.data_dir.as_deref()).map_err(|e| {
            ApiError::internal(format!("Failed to load catalogs: {}", e))
        })?;
        info!(
            "Catalogs loaded: {} genericos, {} psiquiatria, {} referencias",
            catalogs.genericos.len(),
            catalogs.psiquiatria.len(),
            catalogs.referencias.len()
        );

        let chat = config.anthropic_config();
        let mut state = Self::new(catalogs, config);

        match chat {
            Some(chat) => {
                let client = AnthropicClient::new(chat)?;
                let discussion = Discussion::new(Arc::new(client))?;
                info!("Chat backend configured: {}", discussion.model());
                state = state.with_discussion(discussion);
            }
            None => warn!("ANTHROPIC_API_KEY not set; chat routes will answer 503"),
        }

        Ok(state)
    }

    /// The discussion service, or 503 when no backend is configured
    pub fn discussion(&self) -> ApiResult<&Discussion> {
        self.discussion.as_ref().ok_or_else(|| {
            ApiError::unavailable("Assistente indisponível: chave da API não configurada")
        })
    }
}

/// GET /api/status - Service status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        timestamp: Utc::now(),
        versao: env!("CARGO_PKG_VERSION"),
        tipo: "Sistema de Discussão entre Psiquiatras",
        abordagem: "Fenomenológica-Descritiva",
        sessoes_ativas: state.sessions.len().await,
        claude_configurado: state.discussion.is_some(),
        modelo: state.discussion.as_ref().map(|d| d.model().to_string()),
        catalogos: CatalogSizes {
            genericos: state.catalogs.genericos.len(),
            psiquiatria: state.catalogs.psiquiatria.len(),
            referencias: state.catalogs.referencias.len(),
        },
    })
}

/// GET /api/health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "consulta",
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.catalogs.total(),
    }))
}

/// Create router with all API endpoints
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/status", get(status))
        .merge(genericos::routes())
        .merge(psiquiatria::routes())
        .merge(referencias::routes())
        .merge(sessions::routes())
}

/// Parse a `limit` query value; anything but an integer means "catalog default"
pub(crate) fn parse_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|l| l.trim().parse::<i64>().ok())
}

/// Parse a boolean query flag: `true` in any case is true, anything else false
pub(crate) fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Non-blank trimmed value
pub(crate) fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("10"), Some(10))]
    #[case(Some(" 7 "), Some(7))]
    #[case(Some("-3"), Some(-3))]
    #[case(Some("dez"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn test_parse_limit(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(parse_limit(raw), expected);
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("True", true)]
    #[case("1", false)]
    #[case("yes", false)]
    #[case("", false)]
    fn test_parse_flag(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[test]
    fn test_missing_backend_is_unavailable() {
        let state = AppState::new(Catalogs::embedded().unwrap(), ServerConfig::default());
        let err = state.discussion().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }
}
