//! Pure state transition function
//!
//! Given the same session and event this always yields the same result and
//! touches nothing. `Session::handle` commits the returned mutations only on
//! `Ok`, which keeps every command all-or-nothing.

use super::{
    AssistantKind, AsyncOperation, Effect, Event, Mutation, OperationKind, OperationToken,
    OpportunityRecord, Role, Session, SessionError, SessionPhase,
};
use crate::adapters::{GenerationError, IngestionError};

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_phase: SessionPhase,
    pub mutations: Vec<Mutation>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(phase: SessionPhase) -> Self {
        Self {
            new_phase: phase,
            mutations: vec![],
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Compute the outcome of `event` without touching `session`.
///
/// # Errors
///
/// The [`SessionError`] explaining why the event cannot be applied in the
/// current phase.
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, SessionError> {
    // Starting a second operation is refused before anything else is looked at
    if matches!(event, Event::SubmitReference { .. } | Event::SendMessage { .. }) {
        if let Some(op) = session.outstanding_operation() {
            return Err(SessionError::OperationBusy(op.kind));
        }
    }

    match event {
        Event::SubmitReference { reference } => submit_reference(session, &reference),
        Event::IngestionFinished { token, result } => finish_ingestion(session, token, result),
        Event::SelectAssistant { kind } => select_assistant(session.current_phase(), kind),
        Event::SendMessage { text } => send_message(session, text),
        Event::GenerationFinished { token, result } => finish_generation(session, token, result),
        Event::Reset => Ok(reset(session)),
    }
}

// ============================================================
// Opportunity ingestion
// ============================================================

fn submit_reference(session: &Session, reference: &str) -> Result<TransitionResult, SessionError> {
    let phase = session.current_phase();
    if phase != SessionPhase::AwaitingOpportunity {
        return Err(SessionError::InvalidCommand {
            command: "submit an opportunity reference",
            phase,
        });
    }

    let reference = reference.trim();
    if reference.is_empty() {
        return Err(SessionError::ReferenceInvalid);
    }
    Ok(TransitionResult::new(SessionPhase::IngestingOpportunity)
        .with_mutation(Mutation::Begin(OperationKind::Ingestion))
        .with_effect(Effect::FetchOpportunity {
            token: session.tracker().next_token(),
            reference: reference.to_string(),
        }))
}

fn finish_ingestion(
    session: &Session,
    token: OperationToken,
    result: Result<OpportunityRecord, IngestionError>,
) -> Result<TransitionResult, SessionError> {
    let expected = AsyncOperation {
        kind: OperationKind::Ingestion,
        token,
    };
    if session.outstanding_operation() != Some(expected)
        || session.current_phase() != SessionPhase::IngestingOpportunity
    {
        return Err(SessionError::StaleResult(OperationKind::Ingestion));
    }

    match result {
        Ok(record) => {
            let announcement = ingestion_succeeded_text(&record.title);
            Ok(TransitionResult::new(SessionPhase::SelectingAssistant)
                .with_mutation(Mutation::Finish(token))
                .with_mutation(Mutation::StoreOpportunity(record))
                .with_mutation(Mutation::append(Role::System, announcement)))
        }
        Err(e) => Ok(TransitionResult::new(SessionPhase::AwaitingOpportunity)
            .with_mutation(Mutation::Finish(token))
            .with_mutation(Mutation::append(
                Role::System,
                ingestion_failed_text(&e.to_string()),
            ))),
    }
}

// ============================================================
// Assistant selection
// ============================================================

fn select_assistant(
    phase: SessionPhase,
    kind: AssistantKind,
) -> Result<TransitionResult, SessionError> {
    if phase != SessionPhase::SelectingAssistant {
        return Err(SessionError::InvalidCommand {
            command: "select an assistant",
            phase,
        });
    }
    Ok(TransitionResult::new(SessionPhase::Conversing)
        .with_mutation(Mutation::StoreAssistant(kind))
        .with_mutation(Mutation::append(Role::Assistant, kind.welcome_message())))
}

// ============================================================
// Conversation
// ============================================================

fn send_message(session: &Session, text: String) -> Result<TransitionResult, SessionError> {
    let phase = session.current_phase();
    if phase != SessionPhase::Conversing {
        return Err(SessionError::InvalidCommand {
            command: "send a message",
            phase,
        });
    }
    if text.trim().is_empty() {
        return Err(SessionError::EmptyMessage);
    }
    let Some(kind) = session.assistant_kind() else {
        return Err(SessionError::InvalidCommand {
            command: "send a message without an assistant",
            phase,
        });
    };

    Ok(TransitionResult::new(SessionPhase::Conversing)
        .with_mutation(Mutation::Begin(OperationKind::Generation))
        .with_mutation(Mutation::append(Role::User, text))
        .with_effect(Effect::GenerateReply {
            token: session.tracker().next_token(),
            kind,
        }))
}

fn finish_generation(
    session: &Session,
    token: OperationToken,
    result: Result<String, GenerationError>,
) -> Result<TransitionResult, SessionError> {
    let expected = AsyncOperation {
        kind: OperationKind::Generation,
        token,
    };
    if session.outstanding_operation() != Some(expected)
        || session.current_phase() != SessionPhase::Conversing
    {
        return Err(SessionError::StaleResult(OperationKind::Generation));
    }

    let reply = match result {
        Ok(text) => Mutation::append(Role::Assistant, text),
        Err(e) => Mutation::append(Role::System, generation_failed_text(&e.to_string())),
    };
    Ok(TransitionResult::new(SessionPhase::Conversing)
        .with_mutation(Mutation::Finish(token))
        .with_mutation(reply))
}

// ============================================================
// Reset
// ============================================================

fn reset(session: &Session) -> TransitionResult {
    let abort = session
        .outstanding_operation()
        .map(|op| Effect::AbortOperation { token: op.token });
    TransitionResult::new(SessionPhase::AwaitingOpportunity)
        .with_mutation(Mutation::Reset)
        .with_effects(abort)
}

#[must_use]
pub fn ingestion_succeeded_text(title: &str) -> String {
    format!(
        "Successfully extracted opportunity data for \"{title}\". Please select an AI assistant to begin working on this opportunity."
    )
}

#[must_use]
pub fn ingestion_failed_text(detail: &str) -> String {
    format!("Error extracting opportunity data ({detail}). Please check the URL and try again.")
}

#[must_use]
pub fn generation_failed_text(detail: &str) -> String {
    format!("The assistant could not produce a reply ({detail}). Please try again.")
}
