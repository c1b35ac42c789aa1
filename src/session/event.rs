//! Inputs to the session state machine

use super::{AssistantKind, OpportunityRecord, OperationToken};
use crate::adapters::{GenerationError, IngestionError};

/// Commands from the operator and completions from collaborators
#[derive(Debug, Clone)]
pub enum Event {
    // Operator commands
    SubmitReference {
        reference: String,
    },
    SelectAssistant {
        kind: AssistantKind,
    },
    SendMessage {
        text: String,
    },
    Reset,

    // Collaborator completions
    IngestionFinished {
        token: OperationToken,
        result: Result<OpportunityRecord, IngestionError>,
    },
    GenerationFinished {
        token: OperationToken,
        result: Result<String, GenerationError>,
    },
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Event::SubmitReference { .. } => "submit_reference",
            Event::SelectAssistant { .. } => "select_assistant",
            Event::SendMessage { .. } => "send_message",
            Event::Reset => "reset",
            Event::IngestionFinished { .. } => "ingestion_finished",
            Event::GenerationFinished { .. } => "generation_finished",
        }
    }

    /// Completions are produced by the runtime, never by the operator
    #[must_use]
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::IngestionFinished { .. } | Event::GenerationFinished { .. }
        )
    }
}
