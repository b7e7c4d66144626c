use super::{DocumentStore, ReadingSession, trim_sessions, upsert_into};
use crate::document::Document;
use crate::error::Result;
use crate::preferences::UserPreferences;

/// In-process store. Nothing outlives the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: Vec<Document>,
    preferences: UserPreferences,
    sessions: Vec<ReadingSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }

    fn upsert(&mut self, document: &Document) -> Result<()> {
        upsert_into(&mut self.documents, document);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        Ok(self.documents.len() != before)
    }

    fn load_preferences(&self) -> Result<UserPreferences> {
        Ok(self.preferences.clone())
    }

    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()> {
        self.preferences = preferences.clone();
        Ok(())
    }

    fn record_session(&mut self, session: ReadingSession) -> Result<()> {
        self.sessions.push(session);
        trim_sessions(&mut self.sessions);
        Ok(())
    }

    fn load_sessions(&self) -> Result<Vec<ReadingSession>> {
        Ok(self.sessions.clone())
    }
}
