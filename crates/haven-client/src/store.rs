//! On-disk session persistence
//!
//! The store is the sole owner of the locally persisted session payload:
//! one JSON file holding `{user, token}`. It is written on successful
//! login/register, read once at application start, and removed on logout.

use haven_core::AuthPayload;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read session file: {0}")]
    Read(std::io::Error),

    #[error("Failed to write session file: {0}")]
    Write(std::io::Error),

    #[error("Failed to encode session payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the session payload
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted payload, if any
    ///
    /// A missing file means no session. A corrupt file is treated the same
    /// way rather than wedging the client; the next login overwrites it.
    pub fn load(&self) -> Result<Option<AuthPayload>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "discarding corrupt session file");
                Ok(None)
            }
        }
    }

    /// Persist the payload, creating parent directories as needed
    pub fn save(&self, payload: &AuthPayload) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        let contents = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, contents).map_err(StoreError::Write)
    }

    /// Remove the persisted payload
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::{Role, SafeIdentity};
    use uuid::Uuid;

    fn temp_store() -> SessionStore {
        let path = std::env::temp_dir()
            .join(format!("haven-store-test-{}", Uuid::new_v4()))
            .join("session.json");
        SessionStore::new(path)
    }

    fn sample_payload() -> AuthPayload {
        AuthPayload {
            user: SafeIdentity {
                id: Uuid::new_v4(),
                name: "Ava".to_string(),
                email: "ava@x.com".to_string(),
                role: Role::Victim,
            },
            token: "header.claims.sig".to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let store = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = temp_store();
        let payload = sample_payload();

        store.save(&payload).unwrap();
        let loaded = store.load().unwrap().expect("payload present");
        assert_eq!(loaded, payload);

        store.clear().unwrap();
    }

    #[test]
    fn test_clear_removes_payload() {
        let store = temp_store();
        store.save(&sample_payload()).unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing again is a no-op
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let store = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().unwrap().is_none());

        store.clear().unwrap();
    }
}
