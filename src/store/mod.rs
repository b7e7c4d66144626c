//! Persistence collaborator: documents, preferences and reading sessions.
//!
//! The core never reaches for storage on its own. Callers hand a
//! [`DocumentStore`] to whatever needs one. Records are replaced wholesale
//! on update and keyed by document id.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;
use crate::preferences::{ReadingMode, UserPreferences};
use crate::util::new_id;

/// Only this many of the most recent sessions are retained.
pub const MAX_SESSIONS: usize = 100;

/// A key-value record store for documents and reader state.
pub trait DocumentStore {
    /// Every stored document, in insertion order.
    fn load_all(&self) -> Result<Vec<Document>>;

    /// Insert `document`, or replace the stored record with the same id.
    fn upsert(&mut self, document: &Document) -> Result<()>;

    /// Remove a document. Returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool>;

    fn load_preferences(&self) -> Result<UserPreferences>;

    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()>;

    /// Append a session, dropping the oldest beyond [`MAX_SESSIONS`].
    fn record_session(&mut self, session: ReadingSession) -> Result<()>;

    fn load_sessions(&self) -> Result<Vec<ReadingSession>>;

    fn load(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.load_all()?.into_iter().find(|d| d.id == id))
    }
}

/// Move a stored document's cursor and write it back.
///
/// Returns the updated record, or `None` if no document has this id.
pub fn update_progress<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: &str,
    position: usize,
) -> Result<Option<Document>> {
    let Some(mut document) = store.load(id)? else {
        log::warn!("progress update for unknown document {id}");
        return Ok(None);
    };
    document.record_position(position);
    store.upsert(&document)?;
    Ok(Some(document))
}

/// One stretch of reading a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    pub id: String,
    pub document_id: String,
    /// Milliseconds since the Unix epoch.
    pub start_time: u64,
    pub end_time: u64,
    pub start_position: usize,
    pub end_position: usize,
    pub words_read: usize,
    /// Words per minute over the session's wall-clock time.
    pub average_speed: u32,
    pub mode: ReadingMode,
}

impl ReadingSession {
    pub fn new(
        document_id: &str,
        mode: ReadingMode,
        (start_time, end_time): (u64, u64),
        (start_position, end_position): (usize, usize),
    ) -> Self {
        let words_read = end_position.saturating_sub(start_position);
        let minutes = end_time.saturating_sub(start_time) as f64 / 60_000.0;
        let average_speed = if minutes > 0.0 {
            (words_read as f64 / minutes).round() as u32
        } else {
            0
        };

        Self {
            id: new_id(),
            document_id: document_id.to_string(),
            start_time,
            end_time,
            start_position,
            end_position,
            words_read,
            average_speed,
            mode,
        }
    }
}

pub(crate) fn trim_sessions(sessions: &mut Vec<ReadingSession>) {
    if sessions.len() > MAX_SESSIONS {
        let excess = sessions.len() - MAX_SESSIONS;
        sessions.drain(..excess);
    }
}

pub(crate) fn upsert_into(documents: &mut Vec<Document>, document: &Document) {
    match documents.iter_mut().find(|d| d.id == document.id) {
        Some(existing) => *existing = document.clone(),
        None => documents.push(document.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_speed() {
        let session = ReadingSession::new("doc", ReadingMode::Rsvp, (0, 120_000), (10, 610));
        assert_eq!(session.words_read, 600);
        assert_eq!(session.average_speed, 300);

        let instant = ReadingSession::new("doc", ReadingMode::Traditional, (5, 5), (3, 1));
        assert_eq!(instant.words_read, 0);
        assert_eq!(instant.average_speed, 0);
    }

    #[test]
    fn test_trim_sessions_keeps_latest() {
        let mut sessions: Vec<ReadingSession> = (0..105)
            .map(|i| ReadingSession::new("doc", ReadingMode::Rsvp, (i, i + 1), (0, 0)))
            .collect();
        trim_sessions(&mut sessions);
        assert_eq!(sessions.len(), MAX_SESSIONS);
        assert_eq!(sessions[0].start_time, 5);
        assert_eq!(sessions[99].start_time, 104);
    }
}
