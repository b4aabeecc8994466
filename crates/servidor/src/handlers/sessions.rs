//! Discussion session endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use busca::{Filter, SearchQuery};
use catalogo::referencias::{Category, Reference};
use chrono::Utc;
use conversa::{greeting, PERSONA_NAME};
use serde::Deserialize;
use sessao::{export_transcript, transcript_file_name, Colleague};
use tracing::info;

use super::{non_blank, AppState};
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    ChatReply, Participants, ReadingSuggestions, SessionFinished, SessionHistory, SessionInfo,
    SessionStarted, SessionSummary,
};

/// Citations offered by a reading suggestion
pub const MAX_SUGGESTIONS: usize = 10;

/// Body of `POST /api/iniciar-sessao`
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Colleague name, required
    pub nome: Option<String>,

    /// Specialty
    pub especialidade: Option<String>,

    /// Institution
    pub instituicao: Option<String>,

    /// Opening topic
    pub topico: Option<String>,
}

/// Body of `POST /api/conversar`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Session id
    pub sessao_id: Option<String>,

    /// Colleague message
    pub mensagem: Option<String>,
}

/// Body of `POST /api/finalizar-sessao`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRequest {
    /// Session id
    pub sessao_id: Option<String>,

    /// Closing summary
    pub resumo: Option<String>,
}

/// Body of `POST /api/buscar-referencias`
#[derive(Debug, Default, Deserialize)]
pub struct ReadingRequest {
    /// Topic, required
    pub topico: Option<String>,

    /// Category of references wanted
    pub tipo: Option<String>,
}

fn owned(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/iniciar-sessao - Open a discussion
pub async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSessionRequest>,
) -> ApiResult<Json<SessionStarted>> {
    let name = non_blank(body.nome.as_deref())
        .ok_or_else(|| ApiError::bad_request("Nome é obrigatório"))?;

    let colleague = Colleague {
        name: name.to_string(),
        specialty: owned(body.especialidade),
        institution: owned(body.instituicao),
        topic: owned(body.topico),
    };
    let mensagem = greeting(&colleague);
    let session = state.sessions.create(colleague).await;
    info!("Discussion started: {} with {}", session.id, session.colleague.display_name());

    Ok(Json(SessionStarted {
        sessao_id: session.id,
        mensagem,
        tipo: session.kind,
    }))
}

/// POST /api/conversar - One discussion turn
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    let (Some(session_id), Some(message)) = (
        non_blank(body.sessao_id.as_deref()),
        non_blank(body.mensagem.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "ID da sessão e mensagem são obrigatórios",
        ));
    };

    if state.sessions.peek(session_id).await.is_none() {
        return Err(sessao::Error::NotFound(session_id.to_string()).into());
    }
    let discussion = state.discussion()?;

    let reply = discussion.reply(&state.sessions, session_id, message).await?;
    info!("Discussion turn in session {}", reply.session_id);

    Ok(Json(ChatReply {
        resposta: reply.answer,
        sessao_id: reply.session_id,
        categorias: reply.categories,
    }))
}

/// GET /api/sessao/:id - Session metadata
pub async fn session_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionInfo>> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or(sessao::Error::NotFound(id))?;
    Ok(Json(session.into()))
}

/// GET /api/sessao/:id/historico - Session history
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionHistory>> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or(sessao::Error::NotFound(id))?;
    Ok(Json(SessionHistory {
        historico: session.history,
        colega: session.colleague,
    }))
}

/// GET /api/sessao/:id/exportar - Plain-text transcript attachment
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or(sessao::Error::NotFound(id))?;

    let disposition = format!("attachment; filename=\"{}\"", transcript_file_name(&session));
    let body = export_transcript(&session, PERSONA_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /api/finalizar-sessao - Close a discussion
pub async fn finish_session(
    State(state): State<AppState>,
    Json(body): Json<FinishRequest>,
) -> ApiResult<Json<SessionFinished>> {
    let session_id = non_blank(body.sessao_id.as_deref())
        .ok_or_else(|| ApiError::bad_request("ID da sessão é obrigatório"))?;

    let session = state.sessions.finish(session_id, owned(body.resumo)).await?;
    info!("Discussion finished: {}", session.id);

    Ok(Json(SessionFinished {
        mensagem: "Discussão finalizada com sucesso",
        resumo: SessionSummary {
            duracao: session.duration(Utc::now()).num_milliseconds(),
            total_mensagens: session.message_count(),
            participantes: Participants {
                dr_alexandre: PERSONA_NAME,
                colega: session.colleague.display_name(),
            },
            texto: session.summary,
        },
    }))
}

/// Citations for a topic within a category.
///
/// References matching the topic come first; when none match, the whole
/// category is offered.
pub fn suggest_readings(
    catalog: &busca::Catalog<Reference>,
    topic: &str,
    category: Category,
) -> Vec<String> {
    let in_category = Filter::equals("category", category.as_str());
    let query = SearchQuery::new(topic)
        .with_filter(in_category.clone())
        .with_limit(MAX_SUGGESTIONS as i64);

    let mut matches = catalog.search(&query);
    if matches.is_empty() {
        matches = catalog.search(
            &SearchQuery::new("")
                .with_filter(in_category)
                .with_limit(MAX_SUGGESTIONS as i64),
        );
    }
    matches.into_iter().map(Reference::citation).collect()
}

/// POST /api/buscar-referencias - Reading suggestions for a topic
pub async fn suggest_references(
    State(state): State<AppState>,
    Json(body): Json<ReadingRequest>,
) -> ApiResult<Json<ReadingSuggestions>> {
    let topic = non_blank(body.topico.as_deref())
        .ok_or_else(|| ApiError::bad_request("Tópico é obrigatório"))?;
    let category = body
        .tipo
        .as_deref()
        .and_then(|t| t.parse::<Category>().ok())
        .unwrap_or(Category::Integrativa);

    let referencias = suggest_readings(&state.catalogs.referencias, topic, category);

    Ok(Json(ReadingSuggestions {
        topico: topic.to_string(),
        tipo: category,
        referencias,
        sugestao: "Posso elaborar mais sobre qualquer uma dessas referências ou buscar outras mais específicas.",
    }))
}

/// Session and chat routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/iniciar-sessao", post(start_session))
        .route("/api/conversar", post(chat))
        .route("/api/sessao/:id", get(session_info))
        .route("/api/sessao/:id/historico", get(history))
        .route("/api/sessao/:id/exportar", get(export))
        .route("/api/finalizar-sessao", post(finish_session))
        .route("/api/buscar-referencias", post(suggest_references))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogo::Catalogs;

    #[test]
    fn test_readings_match_topic_within_category() {
        let catalogs = Catalogs::embedded().unwrap();
        let readings =
            suggest_readings(&catalogs.referencias, "psicopatologia", Category::Fenomenologica);
        assert!(!readings.is_empty());
        assert!(readings.iter().any(|c| c.starts_with("Jaspers")));
    }

    #[test]
    fn test_readings_fall_back_to_category() {
        let catalogs = Catalogs::embedded().unwrap();
        let readings = suggest_readings(&catalogs.referencias, "xyzzy", Category::Integrativa);
        let expected = catalogs
            .referencias
            .iter()
            .filter(|r| r.category == Category::Integrativa)
            .count()
            .min(MAX_SUGGESTIONS);
        assert_eq!(readings.len(), expected);
    }

    #[test]
    fn test_blank_values_are_dropped() {
        assert_eq!(owned(Some("  ".to_string())), None);
        assert_eq!(owned(Some("UTI".to_string())), Some("UTI".to_string()));
    }
}
