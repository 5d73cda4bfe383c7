// Draft store - per-section offline cache of the record list
use crate::application::local_storage::{LocalStorage, StorageError};
use crate::domain::record::{decode_records_str, Record};
use crate::domain::section::Section;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("could not encode draft: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn LocalStorage>,
    namespace: String,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn LocalStorage>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn key(&self, section: Section) -> String {
        format!("{}:{}", self.namespace, section.slug())
    }

    /// Stored draft, or the bundled defaults when nothing usable is stored.
    pub fn load(&self, section: Section) -> Vec<Record> {
        let key = self.key(section);
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No draft stored under {}, using defaults", key);
                return section.default_records();
            }
            Err(e) => {
                tracing::error!("Failed to read draft {}: {}", key, e);
                return section.default_records();
            }
        };

        match decode_records_str(&raw) {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                tracing::debug!("Draft {} is empty, using defaults", key);
                section.default_records()
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable draft {}: {}", key, e);
                section.default_records()
            }
        }
    }

    pub fn save(&self, section: Section, records: &[Record]) -> Result<(), DraftError> {
        let raw = serde_json::to_string(records)?;
        self.storage.set(&self.key(section), &raw)?;
        Ok(())
    }

    pub fn clear(&self, section: Section) -> Result<(), DraftError> {
        self.storage.remove(&self.key(section))?;
        Ok(())
    }
}
