// Session data model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kind recorded on every discussion session
pub const CLINICAL_DISCUSSION: &str = "discussao_clinica";

/// The colleague taking part in a discussion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colleague {
    /// Name, required
    #[serde(rename = "nome")]
    pub name: String,

    /// Specialty
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    /// Institution
    #[serde(rename = "instituicao", default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Opening topic
    #[serde(rename = "topico", default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Colleague {
    /// Colleague with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Honorific form used in greetings and transcripts
    pub fn display_name(&self) -> String {
        format!("Dr(a). {}", self.name)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    /// The human colleague
    #[serde(rename = "colega")]
    Colleague,

    /// The assistant answering through the chat backend
    #[serde(rename = "assistente")]
    Assistant,
}

/// One turn of the discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn
    #[serde(rename = "tipo")]
    pub author: Author,

    /// Text
    #[serde(rename = "conteudo")]
    pub content: String,

    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accepting messages
    #[serde(rename = "ativa")]
    Active,

    /// Closed by the colleague
    #[serde(rename = "finalizada")]
    Finished,
}

/// A discussion session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Participant
    #[serde(rename = "colega")]
    pub colleague: Colleague,

    /// Session kind
    #[serde(rename = "tipo")]
    pub kind: String,

    /// Messages, oldest first
    #[serde(rename = "historico")]
    pub history: Vec<Message>,

    /// Question categories seen so far, in first-seen order
    #[serde(rename = "topicos_discutidos")]
    pub topics: Vec<String>,

    /// Creation time
    #[serde(rename = "iniciada")]
    pub started_at: DateTime<Utc>,

    /// Last read or write
    #[serde(rename = "ultimaAtividade")]
    pub last_activity: DateTime<Utc>,

    /// Lifecycle state
    pub status: SessionStatus,

    /// Closing summary
    #[serde(rename = "resumo", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Session {
    /// New active session started at `now`
    pub fn new(id: String, colleague: Colleague, now: DateTime<Utc>) -> Self {
        Self {
            id,
            colleague,
            kind: CLINICAL_DISCUSSION.to_string(),
            history: Vec::new(),
            topics: Vec::new(),
            started_at: now,
            last_activity: now,
            status: SessionStatus::Active,
            summary: None,
        }
    }

    /// Whether the session still accepts messages
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Number of recorded turns
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Time elapsed since the session started
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        now - self.started_at
    }

    /// Record new topics, skipping ones already present
    pub fn add_topics<I, S>(&mut self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for topic in topics {
            let topic = topic.into();
            if !self.topics.contains(&topic) {
                self.topics.push(topic);
            }
        }
    }
}
