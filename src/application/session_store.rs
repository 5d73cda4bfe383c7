// Persists the session between runs; views receive it explicitly
use crate::application::local_storage::{LocalStorage, StorageError};
use crate::domain::session::Session;
use std::sync::Arc;

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn LocalStorage>,
    key: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn LocalStorage>, namespace: &str) -> Self {
        Self {
            storage,
            key: format!("{}:session", namespace),
        }
    }

    /// Stored session, or an anonymous one when missing or unreadable.
    pub fn load(&self) -> Session {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable session: {}", e);
                Session::anonymous()
            }),
            Ok(None) => Session::anonymous(),
            Err(e) => {
                tracing::error!("Failed to read session: {}", e);
                Session::anonymous()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;
        self.storage.set(&self.key, &raw)
    }

    /// Forget stored credentials and reset `session` to anonymous.
    pub fn clear(&self, session: &mut Session) {
        *session = Session::anonymous();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::error!("Failed to clear stored session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{Role, UserProfile};
    use crate::infrastructure::memory_storage::MemoryStorage;

    #[test]
    fn test_save_load_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone(), "newsdesk");
        let mut session = Session::new(
            "t0k",
            UserProfile {
                name: "Kemi".to_string(),
                email: "kemi@example.com".to_string(),
                role: Role::Editor,
            },
        );

        store.save(&session).unwrap();
        assert_eq!(store.load(), session);

        store.clear(&mut session);
        assert_eq!(session, Session::anonymous());
        assert_eq!(store.load(), Session::anonymous());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_garbage_is_anonymous() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("newsdesk:session", "{{{").unwrap();
        assert_eq!(SessionStore::new(storage, "newsdesk").load(), Session::anonymous());
    }
}
