// conversa - Clinical Conversation
//
// *A Conversa* (The Conversation) - Question triage, prompt assembly and the
// chat backend behind colleague discussions

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Turns a colleague's question into a prompt and the backend's reply into a
//! session turn.

/// Anthropic Messages API client
pub mod anthropic;

/// Chat backend trait
pub mod backend;

/// Question categorization
pub mod categorizer;

/// Discussion turns
pub mod discussion;

/// Conversation errors
pub mod error;

/// Prompt assembly
pub mod prompt;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use backend::ChatBackend;
pub use categorizer::{Categorizer, QuestionCategory};
pub use discussion::{Discussion, Reply};
pub use error::{Error, Result};
pub use prompt::{build_prompt, discussion_context, greeting, PERSONA_NAME};
