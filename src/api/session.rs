//! Persisted login session (bearer token plus the signed-in user).

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::models::UserInfo;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

/// Where the session lives between requests and restarts.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: Option<&Session>);
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, session: Option<&Session>) {
        *self
            .session
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = session.cloned();
    }
}

/// JSON file on disk, re-read on every `load`.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileSessionStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileSessionStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        FileSessionStore { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, session: Option<&Session>) {
        let result = match session {
            Some(session) => serde_json::to_string(session)
                .map_err(std::io::Error::other)
                .and_then(|json| {
                    if let Some(parent) = self.path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&self.path, json)
                }),
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            tracing::error!("Failed to persist session to {}: {}", self.path.display(), e);
        }
    }
}

/// Browser `localStorage`, the web build's persisted storage.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageSessionStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageSessionStore {
    pub fn new(key: &str) -> Self {
        LocalStorageSessionStore { key: key.to_string() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = Self::storage()?.get_item(&self.key).ok()??;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, session: Option<&Session>) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let _ = match session.and_then(|s| serde_json::to_string(s).ok()) {
            Some(json) => storage.set_item(&self.key, &json),
            None => storage.remove_item(&self.key),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn session() -> Session {
        Session {
            token: "abc.def".into(),
            user: UserInfo {
                id: "u1".into(),
                username: "kiran".into(),
                email: None,
                role: UserRole::TeamLead,
                team_lead: None,
            },
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::default();
        assert!(store.load().is_none());
        store.save(Some(&session()));
        assert_eq!(store.load(), Some(session()));
        store.save(None);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(&path);

        store.save(Some(&session()));
        assert!(path.exists());

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load(), Some(session()));

        reopened.save(None);
        assert!(!path.exists());
        // Clearing twice is not an error
        reopened.save(None);
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileSessionStore::new(&path).load().is_none());
    }
}
