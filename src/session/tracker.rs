//! Tracking of the single outstanding asynchronous operation
//!
//! Every operation gets a token minted from a generation counter. A completion
//! is only accepted while its token is the outstanding one, so results that
//! arrive after a reset (or a second completion for the same operation) are inert.

use super::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collaborator an operation is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Ingestion,
    Generation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Ingestion => f.write_str("ingestion"),
            OperationKind::Generation => f.write_str("generation"),
        }
    }
}

/// Opaque generation value identifying one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationToken(u64);

impl OperationToken {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// An operation that has been started and not yet resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncOperation {
    pub kind: OperationKind,
    pub token: OperationToken,
}

/// Allows at most one outstanding operation
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    generation: u64,
    outstanding: Option<AsyncOperation>,
}

impl OperationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token the next successful `begin` will return
    #[must_use]
    pub fn next_token(&self) -> OperationToken {
        OperationToken(self.generation + 1)
    }

    /// Start an operation.
    ///
    /// # Errors
    ///
    /// `OperationBusy` if one is already outstanding.
    pub fn begin(&mut self, kind: OperationKind) -> Result<OperationToken, SessionError> {
        if let Some(op) = self.outstanding {
            return Err(SessionError::OperationBusy(op.kind));
        }
        self.generation += 1;
        let token = OperationToken(self.generation);
        self.outstanding = Some(AsyncOperation { kind, token });
        Ok(token)
    }

    /// Whether `token` names the outstanding operation
    #[must_use]
    pub fn is_current(&self, token: OperationToken) -> bool {
        self.outstanding.is_some_and(|op| op.token == token)
    }

    /// Resolve the outstanding operation if `token` matches it.
    ///
    /// Returns `None` for stale tokens, leaving the tracker untouched.
    pub fn complete(&mut self, token: OperationToken) -> Option<AsyncOperation> {
        if self.is_current(token) {
            self.outstanding.take()
        } else {
            None
        }
    }

    /// Invalidate the outstanding operation's token, if any
    pub fn cancel(&mut self) -> Option<AsyncOperation> {
        self.generation += 1;
        self.outstanding.take()
    }

    #[must_use]
    pub fn outstanding(&self) -> Option<AsyncOperation> {
        self.outstanding
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.outstanding.is_some()
    }
}
