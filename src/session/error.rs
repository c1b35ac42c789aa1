//! Session command rejections

use super::{OperationKind, SessionPhase};
use thiserror::Error;

/// Why a command or completion was not applied.
///
/// None of these are fatal: the session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Opportunity reference is empty")]
    ReferenceInvalid,
    #[error("Message text is empty")]
    EmptyMessage,
    #[error("Session is busy: {0} already in progress")]
    OperationBusy(OperationKind),
    #[error("Cannot {command} while {phase}")]
    InvalidCommand {
        command: &'static str,
        phase: SessionPhase,
    },
    /// Completion for an operation that is no longer current. Never surfaced to users.
    #[error("Discarded stale {0} result")]
    StaleResult(OperationKind),
}

impl SessionError {
    /// Rejections that should be reported back to whoever issued the command
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SessionError::StaleResult(_))
    }
}
