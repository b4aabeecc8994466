// Discussion turns
//
// *A Discussão* (The Discussion) - One colleague question in, one assistant
// reply out, with the session updated on both sides

use crate::backend::ChatBackend;
use crate::categorizer::{Categorizer, QuestionCategory};
use crate::error::{Error, Result};
use crate::prompt::{build_prompt, discussion_context};
use sessao::{Author, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one discussion turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Session the turn belongs to
    pub session_id: String,

    /// Assistant answer
    pub answer: String,

    /// Categories detected in the question
    pub categories: Vec<QuestionCategory>,
}

/// Runs discussion turns against a chat backend
#[derive(Clone)]
pub struct Discussion {
    categorizer: Categorizer,
    backend: Arc<dyn ChatBackend>,
}

impl std::fmt::Debug for Discussion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discussion")
            .field("model", &self.backend.model())
            .finish()
    }
}

impl Discussion {
    /// Discussion over `backend`
    pub fn new(backend: Arc<dyn ChatBackend>) -> Result<Self> {
        Ok(Self {
            categorizer: Categorizer::new()?,
            backend,
        })
    }

    /// Model answering the discussion
    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Answer `question` within session `session_id`.
    ///
    /// The question is recorded before the backend is called and stays in the
    /// history even when the backend fails.
    pub async fn reply(
        &self,
        store: &SessionStore,
        session_id: &str,
        question: &str,
    ) -> Result<Reply> {
        let session = store
            .get(session_id)
            .await
            .ok_or_else(|| sessao::Error::NotFound(session_id.to_string()))?;
        if !session.is_active() {
            return Err(sessao::Error::Finished(session_id.to_string()).into());
        }

        let categories = self.categorizer.categorize(question);
        let context = discussion_context(&session.colleague);
        let prompt = build_prompt(question, &categories, &session.history, Some(&context));

        store
            .append_message(session_id, Author::Colleague, question)
            .await?;

        let answer = match self.backend.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Discussion {}: backend failed: {}", session_id, e);
                return Err(e);
            }
        };

        store
            .append_message(session_id, Author::Assistant, answer.clone())
            .await?;
        store
            .record_topics(session_id, categories.iter().map(|c| c.as_str()))
            .await?;

        info!(
            "Discussion {}: reply ({} chars, categories: {:?})",
            session_id,
            answer.len(),
            categories
        );

        Ok(Reply {
            session_id: session_id.to_string(),
            answer,
            categories,
        })
    }
}

impl Error {
    /// Whether the error came from the chat backend rather than the session
    pub fn is_backend(&self) -> bool {
        !matches!(self, Self::Session(_) | Self::InvalidPattern(_))
    }
}
