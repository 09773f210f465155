//! Durable storage for the current session, the client-side equivalent of a
//! browser's local storage entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("session slot I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("session slot holds invalid data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait SessionSlot: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SlotError>;
    fn store(&self, session: &Session) -> Result<(), SlotError>;
    fn clear(&self) -> Result<(), SlotError>;
}

/// One JSON file holding the token and user together.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> Result<Option<Session>, SlotError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn store(&self, session: &Session) -> Result<(), SlotError> {
        let raw = serde_json::to_vec_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local slot; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySlot {
    inner: Mutex<Option<Session>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holding(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> Result<Option<Session>, SlotError> {
        Ok(self.guard().clone())
    }

    fn store(&self, session: &Session) -> Result<(), SlotError> {
        *self.guard() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        *self.guard() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colombia_types::models::User;

    fn session() -> Session {
        Session {
            token: "mock_token_42".into(),
            user: User {
                id: "user_42".into(),
                name: "Pablo".into(),
                email: "pablo@colombia.com".into(),
            },
        }
    }

    #[test]
    fn file_slot_survives_reopen_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        FileSlot::new(&path).store(&session()).unwrap();
        let reopened = FileSlot::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(session()));

        reopened.clear().unwrap();
        assert_eq!(reopened.load().unwrap(), None);
        // Clearing twice is fine.
        reopened.clear().unwrap();
    }

    #[test]
    fn garbage_in_file_slot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{\"token\":").unwrap();

        assert!(matches!(FileSlot::new(&path).load(), Err(SlotError::Corrupt(_))));
    }

    #[test]
    fn memory_slot_starts_empty() {
        let slot = MemorySlot::new();
        assert_eq!(slot.load().unwrap(), None);
        slot.store(&session()).unwrap();
        assert!(slot.load().unwrap().is_some());
    }
}
