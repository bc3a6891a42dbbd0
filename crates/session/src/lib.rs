//! Persistent session record for the logged-in user.
//!
//! One JSON file under the configured base path holds `{id, email, role,
//! hospital}`. Login writes it, logout removes it, every other command
//! reads it. No other state survives between commands; the backend is the
//! sole durable owner of everything else.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fed_structs::SessionUser;
use thiserror::Error;
use tracing::debug;

/// File name of the session record under the base path.
const SESSION_FILE: &str = "session.json";

/// Reads and writes the session record.
///
/// The store has a single writer by convention: only the login and logout
/// commands call [`SessionStore::store`] and [`SessionStore::clear`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens the store under the configured base path.
    #[must_use]
    pub fn open_default() -> Self {
        Self::at(&config::CONFIG.base_path)
    }

    /// Opens the store under an explicit directory.
    #[must_use]
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Loads the current session record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Missing`] if no record is stored (the
    /// caller should direct the user to log in) and
    /// [`SessionError::Corrupt`] if the stored record does not decode.
    pub fn load(&self) -> Result<SessionUser, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(SessionError::Missing),
            Err(err) => return Err(SessionError::Io(err)),
        };

        let user = serde_json::from_str(&raw)?;
        Ok(user)
    }

    /// Stores the session record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn store(&self, user: &SessionUser) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(user)?;
        std::fs::write(&self.path, raw)?;

        debug!(email = %user.email, role = %user.role, "Stored session");
        Ok(())
    }

    /// Removes the session record. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared session");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionError::Io(err)),
        }
    }
}

/// Failures of the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session record is stored.
    #[error("no session found; log in first")]
    Missing,

    /// The stored record does not decode as a session user.
    #[error("stored session is not readable: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Reading or writing the record failed.
    #[error("session storage failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use fed_structs::Role;
    use uuid::Uuid;

    use super::*;

    fn temp_store() -> SessionStore {
        SessionStore::at(std::env::temp_dir().join(format!("fedsync-session-{}", Uuid::new_v4())))
    }

    fn sample_user() -> SessionUser {
        SessionUser {
            id: 7,
            email: "ca@cityhosp.org".to_string(),
            role: Role::Central,
            hospital: Some("City Hospital".to_string()),
        }
    }

    #[test]
    fn test_round_trip() {
        let store = temp_store();
        let user = sample_user();

        store.store(&user).unwrap();
        assert_eq!(store.load().unwrap(), user);
    }

    #[test]
    fn test_missing_session() {
        let store = temp_store();
        assert!(matches!(store.load(), Err(SessionError::Missing)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = temp_store();
        store.store(&sample_user()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load(), Err(SessionError::Missing)));
    }
}
