//! Workflow error taxonomy.

use gateway::GatewayError;
use session::SessionError;
use thiserror::Error;

/// Errors surfaced by the workflow layer.
///
/// The variant is the recovery contract: validation stops before any
/// request and keeps the form usable, a fetch failure degrades the view to
/// its previous or empty state, a submit failure preserves the draft for a
/// manual retry, and a session failure sends the user back to login.
/// Backend rejection text passes through unchanged.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required field is missing or a lifecycle transition is not
    /// allowed; detected before any request is issued.
    #[error("{message}")]
    Validation {
        /// What the user has to fix
        message: String,
    },

    /// A read from the backend failed.
    #[error("{source}")]
    Fetch {
        /// Underlying gateway failure
        #[source]
        source: GatewayError,
    },

    /// A write to the backend failed.
    #[error("{source}")]
    Submit {
        /// Underlying gateway failure
        #[source]
        source: GatewayError,
    },

    /// No usable session record.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl WorkflowError {
    /// Builds a validation error from any message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classifies a gateway failure on a read path.
    pub(crate) const fn fetch(source: GatewayError) -> Self {
        Self::Fetch { source }
    }

    /// Classifies a gateway failure on a write path.
    pub(crate) const fn submit(source: GatewayError) -> Self {
        Self::Submit { source }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
