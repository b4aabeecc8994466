// Plain-text discussion transcript

use crate::model::{Author, Session};
use std::fmt::Write;

/// Render a session as a plain-text log.
///
/// Times are UTC, dates in day/month/year order.
pub fn export_transcript(session: &Session, assistant_name: &str) -> String {
    let colleague = session.colleague.display_name();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "DISCUSSÃO CLÍNICA - {} UTC",
        session.started_at.format("%d/%m/%Y %H:%M:%S")
    );
    let _ = writeln!(out, "Participantes: {} & {}", assistant_name, colleague);
    if let Some(specialty) = session.colleague.specialty.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "Especialidade: {specialty}");
    }
    if let Some(summary) = &session.summary {
        let _ = writeln!(out, "Resumo: {summary}");
    }
    out.push_str("\n--- TRANSCRIÇÃO ---\n\n");

    for message in &session.history {
        let speaker = match message.author {
            Author::Colleague => colleague.as_str(),
            Author::Assistant => assistant_name,
        };
        let _ = write!(
            out,
            "[{}] {}: {}\n\n",
            message.timestamp.format("%H:%M:%S"),
            speaker,
            message.content
        );
    }

    out
}

/// Attachment file name for an exported session
pub fn transcript_file_name(session: &Session) -> String {
    format!("discussao_{}.txt", session.id)
}
