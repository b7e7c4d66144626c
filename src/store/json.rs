//! Directory-backed store with one JSON file per collection.
//!
//! Reads are best effort. A missing or unparseable file reads as empty (or
//! as default preferences) and is logged, never surfaced as an error. A
//! document record that fails to deserialize is skipped on read but kept
//! verbatim on write, and a documents file that is not a JSON array is never
//! overwritten. Writes go to a sibling temp file that is then renamed over
//! the target.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DocumentStore, ReadingSession, trim_sessions};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::preferences::UserPreferences;

const DOCUMENTS_FILE: &str = "documents.json";
const SESSIONS_FILE: &str = "sessions.json";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return T::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("ignoring corrupt {}: {e}", path.display());
                T::default()
            }
        }
    }

    /// Raw records of a JSON array file. A missing file is an empty list.
    fn read_records(&self, name: &str) -> Result<Vec<Value>> {
        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Array(records) => Ok(records),
            _ => Err(Error::Store(format!("{} is not a JSON array", path.display()))),
        }
    }

    /// Documents file records for a read-modify-write. Refuses to proceed
    /// when the file cannot be parsed, so it is never clobbered.
    fn records_for_update(&self) -> Result<Vec<Value>> {
        self.read_records(DOCUMENTS_FILE).map_err(|e| {
            log::error!("refusing to rewrite {DOCUMENTS_FILE}: {e}");
            Error::Store(format!("{DOCUMENTS_FILE} is unreadable, not overwriting: {e}"))
        })
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

impl DocumentStore for JsonStore {
    fn load_all(&self) -> Result<Vec<Document>> {
        let records = match self.read_records(DOCUMENTS_FILE) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("ignoring corrupt {DOCUMENTS_FILE}: {e}");
                return Ok(Vec::new());
            }
        };
        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(document) => Some(document),
                Err(e) => {
                    log::warn!("skipping document record {i} in {DOCUMENTS_FILE}: {e}");
                    None
                }
            })
            .collect())
    }

    fn upsert(&mut self, document: &Document) -> Result<()> {
        let mut records = self.records_for_update()?;
        let value = serde_json::to_value(document)?;
        match records.iter_mut().find(|r| record_id(r) == Some(document.id.as_str())) {
            Some(existing) => *existing = value,
            None => records.push(value),
        }
        self.write(DOCUMENTS_FILE, &records)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let mut records = self.records_for_update()?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Ok(false);
        }
        self.write(DOCUMENTS_FILE, &records)?;
        Ok(true)
    }

    fn load_preferences(&self) -> Result<UserPreferences> {
        Ok(self
            .read_or_default::<UserPreferences>(PREFERENCES_FILE)
            .normalized())
    }

    fn save_preferences(&mut self, preferences: &UserPreferences) -> Result<()> {
        self.write(PREFERENCES_FILE, preferences)
    }

    fn record_session(&mut self, session: ReadingSession) -> Result<()> {
        let mut sessions: Vec<ReadingSession> = self.read_or_default(SESSIONS_FILE);
        sessions.push(session);
        trim_sessions(&mut sessions);
        self.write(SESSIONS_FILE, &sessions)
    }

    fn load_sessions(&self) -> Result<Vec<ReadingSession>> {
        Ok(self.read_or_default(SESSIONS_FILE))
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}
