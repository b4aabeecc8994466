// sessao - Discussion Sessions
//
// *A Sessão* (The Session) - In-memory colleague discussions with idle expiry
// and transcript export

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Discussion session state kept in memory for the lifetime of the process.

/// Session errors
pub mod error;

/// Session, colleague and message types
pub mod model;

/// Periodic expiry of idle sessions
pub mod reaper;

/// Keyed session store
pub mod store;

/// Plain-text export
pub mod transcript;

pub use error::{Error, Result};
pub use model::{Author, Colleague, Message, Session, SessionStatus};
pub use reaper::{spawn_reaper, ReaperConfig};
pub use store::SessionStore;
pub use transcript::{export_transcript, transcript_file_name};
