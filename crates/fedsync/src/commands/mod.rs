//! CLI command implementations.

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod download;
pub mod iterations;
pub mod predict;
pub mod submit;

use anyhow::{Context, Result, bail};
use fed_structs::{Role, SessionUser};
use session::{SessionError, SessionStore};

/// Loads the current session, directing the user to log in when absent.
pub fn current_user(store: &SessionStore) -> Result<SessionUser> {
    match store.load() {
        Ok(user) => Ok(user),
        Err(SessionError::Missing) => bail!("no active session; run `fedsync login` first"),
        Err(err) => Err(err).context("failed to load session"),
    }
}

/// Rejects a command the session role may not perform.
pub fn require_role(user: &SessionUser, role: Role) -> Result<()> {
    if user.role == role {
        Ok(())
    } else {
        bail!(
            "this command requires the {role} role; {} is logged in as {}",
            user.email,
            user.role
        );
    }
}
