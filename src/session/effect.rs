//! Side effects requested by transitions

use super::{AssistantKind, OperationKind, OperationToken, OpportunityRecord, Role};

/// I/O the runtime performs after a transition has been committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the ingestion collaborator to resolve a reference
    FetchOpportunity {
        token: OperationToken,
        reference: String,
    },

    /// Ask the generation collaborator for the next assistant reply.
    /// The history is read from the committed log.
    GenerateReply {
        token: OperationToken,
        kind: AssistantKind,
    },

    /// Stop waiting on an operation that reset invalidated
    AbortOperation { token: OperationToken },
}

impl Effect {
    #[must_use]
    pub fn token(&self) -> OperationToken {
        match self {
            Effect::FetchOpportunity { token, .. }
            | Effect::GenerateReply { token, .. }
            | Effect::AbortOperation { token } => *token,
        }
    }
}

/// State changes a transition commits, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Begin(OperationKind),
    Finish(OperationToken),
    StoreOpportunity(OpportunityRecord),
    StoreAssistant(AssistantKind),
    Append { role: Role, content: String },
    /// Replace the session with a fresh one, invalidating any outstanding token
    Reset,
}

impl Mutation {
    #[must_use]
    pub fn append(role: Role, content: impl Into<String>) -> Self {
        Mutation::Append {
            role,
            content: content.into(),
        }
    }
}
