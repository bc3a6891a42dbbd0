//! Iteration records and the finalize/bump lifecycle rules.
//!
//! The backend encodes lifecycle implicitly: `version == 0` marks an
//! iteration finalized, `version > 0` marks it running. [`IterationState`]
//! makes that tagged and keeps every transition behind a checked function.

use core::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One versioned round of a federated model, as delivered by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Iteration {
    /// Backend row ID
    pub id: i64,

    /// Owning central authority user ID; write-only on the backend, so
    /// reads never carry it
    #[serde(default)]
    pub central_auth: Option<i64>,

    /// Owning central authority email
    #[serde(default)]
    pub central_auth_email: Option<String>,

    /// Iteration name, unique per authority
    pub iteration_name: String,

    /// Model architecture name (e.g. "ResNet50")
    pub model_name: String,

    /// Dataset domain the round trains on (e.g. "chest-xray")
    #[serde(default)]
    pub dataset_domain: Option<String>,

    /// Artifact reference: absolute URL or backend-relative media path
    #[serde(default)]
    pub model_file: Option<String>,

    /// Wire version; 0 means finalized, anything greater means running
    pub version: i32,

    /// When the iteration was created
    pub created_at: DateTime<Utc>,
}

impl Iteration {
    /// Derives the tagged lifecycle state from the wire version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionOutOfRange`] if the backend delivered a negative
    /// version.
    pub fn state(&self) -> Result<IterationState, VersionOutOfRange> {
        IterationState::from_version(self.version)
    }

    /// Whether the iteration is active (accepting assignments/submissions).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.version > 0
    }

    /// Whether the iteration has reached its terminal state.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.version == 0
    }
}

/// Tagged lifecycle state of an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationState {
    /// Active round; the version is the round number and is never zero.
    Running {
        /// Current round version
        version: NonZeroU32,
    },

    /// Terminal state, encoded as version 0 on the wire.
    Finalized,
}

impl IterationState {
    /// Maps a wire version to the tagged state.
    ///
    /// # Errors
    ///
    /// Returns [`VersionOutOfRange`] for negative versions; the backend
    /// never produces them in healthy operation.
    pub fn from_version(version: i32) -> Result<Self, VersionOutOfRange> {
        match u32::try_from(version) {
            Ok(0) => Ok(Self::Finalized),
            Ok(v) => Ok(Self::Running {
                // Zero is handled above
                version: NonZeroU32::new(v).ok_or(VersionOutOfRange(version))?,
            }),
            Err(_) => Err(VersionOutOfRange(version)),
        }
    }

    /// Returns the integer the backend expects for this state.
    #[must_use]
    pub const fn wire_version(self) -> u32 {
        match self {
            Self::Running { version } => version.get(),
            Self::Finalized => 0,
        }
    }

    /// Moves a running iteration to a new running version.
    ///
    /// Under [`ReopenPolicy::Forbid`] a finalized iteration stays
    /// finalized; [`ReopenPolicy::Permit`] allows it back into `Running`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Reopen`] when the iteration is finalized
    /// and the policy forbids reopening.
    pub fn bump(self, new_version: NonZeroU32, policy: ReopenPolicy) -> Result<Self, TransitionError> {
        match (self, policy) {
            (Self::Finalized, ReopenPolicy::Forbid) => Err(TransitionError::Reopen),
            _ => Ok(Self::Running {
                version: new_version,
            }),
        }
    }

    /// Moves a running iteration to its terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyFinalized`] when the iteration is
    /// already terminal.
    pub fn finalize(self) -> Result<Self, TransitionError> {
        match self {
            Self::Running { .. } => Ok(Self::Finalized),
            Self::Finalized => Err(TransitionError::AlreadyFinalized),
        }
    }
}

/// Whether a finalized iteration may be moved back to running.
///
/// The backend itself never rejects the transition, so the choice is made
/// here and applied before any request is issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReopenPolicy {
    /// Finalized is terminal; reject any transition out of it.
    #[default]
    Forbid,

    /// Allow a finalized iteration to resume with a fresh running version.
    Permit,
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Attempted to move a finalized iteration back to running.
    #[error("iteration is finalized; reopening is not permitted")]
    Reopen,

    /// Attempted to finalize an iteration that is already finalized.
    #[error("iteration is already finalized")]
    AlreadyFinalized,
}

/// Negative wire version; the lifecycle encoding only covers `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("iteration version {0} is out of range (expected 0 or greater)")]
pub struct VersionOutOfRange(pub i32);

#[cfg(test)]
mod tests {
    use super::*;

    fn running(v: u32) -> IterationState {
        IterationState::Running {
            version: NonZeroU32::new(v).unwrap(),
        }
    }

    #[test]
    fn test_from_version_partition() {
        assert_eq!(IterationState::from_version(0), Ok(IterationState::Finalized));
        assert_eq!(IterationState::from_version(1), Ok(running(1)));
        assert_eq!(IterationState::from_version(7), Ok(running(7)));
        assert_eq!(IterationState::from_version(-1), Err(VersionOutOfRange(-1)));
    }

    #[test]
    fn test_finalize_is_monotonic() {
        let state = running(3).finalize().unwrap();
        assert_eq!(state, IterationState::Finalized);
        assert_eq!(state.finalize(), Err(TransitionError::AlreadyFinalized));
        assert_eq!(state.wire_version(), 0);
    }

    #[test]
    fn test_bump_running() {
        let next = NonZeroU32::new(4).unwrap();
        assert_eq!(
            running(3).bump(next, ReopenPolicy::Forbid),
            Ok(running(4))
        );
    }

    #[test]
    fn test_reopen_policy() {
        let next = NonZeroU32::new(1).unwrap();
        assert_eq!(
            IterationState::Finalized.bump(next, ReopenPolicy::Forbid),
            Err(TransitionError::Reopen)
        );
        assert_eq!(
            IterationState::Finalized.bump(next, ReopenPolicy::Permit),
            Ok(running(1))
        );
    }
}
