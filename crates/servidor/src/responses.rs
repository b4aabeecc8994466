//! API response types matching the frontend contract

use catalogo::genericos::{PurchaseLink, Source};
use catalogo::referencias::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sessao::{Colleague, Message, Session, SessionStatus};
use std::collections::BTreeMap;

/// Ranked search results
#[derive(Debug, Serialize)]
pub struct SearchResponse<R> {
    /// Number of results returned
    pub count: usize,

    /// Results in rank order
    pub results: Vec<R>,
}

impl<R: Clone> SearchResponse<R> {
    /// Copy out a borrowed result list
    pub fn from_ranked(results: Vec<&R>) -> Self {
        Self {
            count: results.len(),
            results: results.into_iter().cloned().collect(),
        }
    }
}

/// Short summary of a catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct ResumoResponse {
    /// Entry id
    pub id: String,

    /// Summary text
    pub resumo: String,
}

/// Formulary overview
#[derive(Debug, Serialize)]
pub struct FormularyOverview {
    /// Number of entries
    pub total: usize,

    /// Therapeutic groups, sorted
    pub grupos: Vec<String>,

    /// Free-availability note
    pub gratuito: &'static str,

    /// Official sources keyed by short name
    pub fontes: BTreeMap<&'static str, Source>,
}

/// Retailer links of a formulary entry
#[derive(Debug, Serialize)]
pub struct FormularyLinks {
    /// Entry id
    pub id: String,

    /// Denomination
    pub dcb: String,

    /// One search link per retailer
    pub compra: Vec<PurchaseLink>,

    /// Usage warning
    pub aviso: &'static str,
}

/// Counts attached to the psychiatric overview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychTotals {
    /// Number of entries
    pub total: usize,

    /// Entries per supply component
    pub por_componente: BTreeMap<String, usize>,
}

/// Named link to an official source
#[derive(Debug, Clone, Serialize)]
pub struct SourceLink {
    /// Title
    pub nome: &'static str,

    /// Location
    pub url: &'static str,
}

/// Psychiatric formulary overview
#[derive(Debug, Serialize)]
pub struct PsychOverview {
    /// Scope statement
    pub escopo: &'static str,

    /// Entry counts
    pub totais: PsychTotals,

    /// Notes on availability and prescription rules
    pub observacoes: &'static [&'static str],

    /// Official sources
    pub fontes: Vec<SourceLink>,
}

/// Psychiatric entry ids grouped by component
#[derive(Debug, Serialize)]
pub struct PsychGroups {
    /// Component to ids
    pub grupos: BTreeMap<String, Vec<String>>,
}

/// Psychiatric source list
#[derive(Debug, Serialize)]
pub struct PsychSources {
    /// Official sources
    pub fontes: Vec<SourceLink>,
}

/// Retailer links of a psychiatric entry
#[derive(Debug, Serialize)]
pub struct PsychLinks {
    /// Entry id
    pub id: String,

    /// Denomination
    pub dcb: String,

    /// Retailer key to search URL
    pub links: BTreeMap<&'static str, String>,
}

/// Count of one bibliography category
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryTotal {
    /// References in the category
    pub total: usize,
}

/// Bibliography overview
#[derive(Debug, Serialize)]
pub struct BibliographyOverview {
    /// Counts per category
    pub categorias: BTreeMap<Category, CategoryTotal>,

    /// Number of references
    pub total: usize,
}

/// Citation of one reference
#[derive(Debug, Serialize)]
pub struct CitationResponse {
    /// Reference id
    pub id: String,

    /// APA-style citation
    pub citation: String,
}

/// Citations of one category
#[derive(Debug, Serialize)]
pub struct CategoryCitations {
    /// Category
    pub categoria: Category,

    /// Number of citations
    pub total: usize,

    /// APA-style citations, in catalog order
    pub referencias: Vec<String>,
}

/// A newly opened discussion
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    /// Session id
    pub sessao_id: String,

    /// Greeting from the assistant
    pub mensagem: String,

    /// Session kind
    pub tipo: String,
}

/// Assistant reply to a colleague message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Answer text
    pub resposta: String,

    /// Session id
    pub sessao_id: String,

    /// Categories detected in the question
    pub categorias: Vec<conversa::QuestionCategory>,
}

/// Session metadata without the history
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    /// Session id
    pub id: String,

    /// Participant
    pub colega: Colleague,

    /// Session kind
    pub tipo: String,

    /// Creation time
    pub iniciada: DateTime<Utc>,

    /// Last read or write
    #[serde(rename = "ultimaAtividade")]
    pub ultima_atividade: DateTime<Utc>,

    /// Number of recorded turns
    #[serde(rename = "totalMensagens")]
    pub total_mensagens: usize,

    /// Question categories seen so far
    pub topicos_discutidos: Vec<String>,

    /// Lifecycle state
    pub status: SessionStatus,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            total_mensagens: session.message_count(),
            id: session.id,
            colega: session.colleague,
            tipo: session.kind,
            iniciada: session.started_at,
            ultima_atividade: session.last_activity,
            topicos_discutidos: session.topics,
            status: session.status,
        }
    }
}

/// Session history
#[derive(Debug, Serialize)]
pub struct SessionHistory {
    /// Turns, oldest first
    pub historico: Vec<Message>,

    /// Participant
    pub colega: Colleague,
}

/// Participants named in a closing summary
#[derive(Debug, Serialize)]
pub struct Participants {
    /// Assistant persona
    pub dr_alexandre: &'static str,

    /// Colleague display name
    pub colega: String,
}

/// Closing figures of a finished session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session length in milliseconds
    pub duracao: i64,

    /// Number of recorded turns
    pub total_mensagens: usize,

    /// Who took part
    pub participantes: Participants,

    /// Stored summary text
    pub texto: Option<String>,
}

/// Result of finishing a session
#[derive(Debug, Serialize)]
pub struct SessionFinished {
    /// Confirmation message
    pub mensagem: &'static str,

    /// Closing figures
    pub resumo: SessionSummary,
}

/// Reading suggestions for a topic
#[derive(Debug, Serialize)]
pub struct ReadingSuggestions {
    /// Topic as requested
    pub topico: String,

    /// Category the citations come from
    pub tipo: Category,

    /// APA-style citations
    pub referencias: Vec<String>,

    /// Follow-up offer
    pub sugestao: &'static str,
}

/// Catalog sizes reported by the status endpoint
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogSizes {
    /// Formulary entries
    pub genericos: usize,

    /// Psychiatric entries
    pub psiquiatria: usize,

    /// References
    pub referencias: usize,
}

/// Service status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `online`
    pub status: &'static str,

    /// Time of the report
    pub timestamp: DateTime<Utc>,

    /// Service version
    pub versao: &'static str,

    /// Service kind
    pub tipo: &'static str,

    /// Clinical approach
    pub abordagem: &'static str,

    /// Stored sessions
    pub sessoes_ativas: usize,

    /// Whether a chat backend is configured
    pub claude_configurado: bool,

    /// Chat backend model, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,

    /// Catalog sizes
    pub catalogos: CatalogSizes,
}
