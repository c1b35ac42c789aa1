//! Opportunity session state machine
//!
//! A `Session` moves through `AwaitingOpportunity`, `IngestingOpportunity`,
//! `SelectingAssistant` and `Conversing`. Commands are validated by the pure
//! [`transition`] function and committed all-or-nothing; collaborator work is
//! requested through [`Effect`]s and resolved by completion events carrying an
//! [`OperationToken`].

mod assistant;
mod effect;
mod error;
mod event;
mod message;
mod opportunity;
mod phase;
mod tracker;
mod transition;

#[cfg(test)]
mod proptests;

pub use assistant::{AssistantKind, UnknownAssistant};
pub use effect::{Effect, Mutation};
pub use error::SessionError;
pub use event::Event;
pub use message::{Message, MessageLog, Role};
pub use opportunity::OpportunityRecord;
pub use phase::SessionPhase;
pub use tracker::{AsyncOperation, OperationKind, OperationToken, OperationTracker};
pub use transition::{
    generation_failed_text, ingestion_failed_text, ingestion_succeeded_text, transition,
    TransitionResult,
};

use crate::adapters::{GenerationError, IngestionError};

/// The aggregate root for one opportunity engagement
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    opportunity: Option<OpportunityRecord>,
    assistant: Option<AssistantKind>,
    log: MessageLog,
    tracker: OperationTracker,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `event` against the current phase and commit it.
    ///
    /// On `Ok` the returned effects must be carried out by the caller.
    ///
    /// # Errors
    ///
    /// Any [`SessionError`] from [`transition`]; the session is then unchanged.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, SessionError> {
        let result = transition(self, event)?;
        Ok(self.commit(result))
    }

    fn commit(&mut self, result: TransitionResult) -> Vec<Effect> {
        for mutation in result.mutations {
            match mutation {
                Mutation::Begin(kind) => {
                    let begun = self.tracker.begin(kind);
                    debug_assert!(begun.is_ok(), "transition admitted a second operation");
                }
                Mutation::Finish(token) => {
                    self.tracker.complete(token);
                }
                Mutation::StoreOpportunity(record) => self.opportunity = Some(record),
                Mutation::StoreAssistant(kind) => self.assistant = Some(kind),
                Mutation::Append { role, content } => {
                    self.log.append(role, content);
                }
                Mutation::Reset => {
                    // The generation counter outlives the session so old tokens stay stale
                    let mut tracker = std::mem::take(&mut self.tracker);
                    tracker.cancel();
                    *self = Session {
                        tracker,
                        ..Session::new()
                    };
                }
            }
        }
        self.phase = result.new_phase;
        result.effects
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// # Errors
    ///
    /// `OperationBusy`, `InvalidCommand` outside `AwaitingOpportunity`, or
    /// `ReferenceInvalid` for a blank reference.
    pub fn submit_opportunity_reference(
        &mut self,
        reference: &str,
    ) -> Result<Vec<Effect>, SessionError> {
        self.handle(Event::SubmitReference {
            reference: reference.to_string(),
        })
    }

    /// # Errors
    ///
    /// `InvalidCommand` outside `SelectingAssistant`.
    pub fn select_assistant(&mut self, kind: AssistantKind) -> Result<Vec<Effect>, SessionError> {
        self.handle(Event::SelectAssistant { kind })
    }

    /// # Errors
    ///
    /// `OperationBusy`, `InvalidCommand` outside `Conversing`, or
    /// `EmptyMessage` for blank text.
    pub fn send_message(&mut self, text: &str) -> Result<Vec<Effect>, SessionError> {
        self.handle(Event::SendMessage {
            text: text.to_string(),
        })
    }

    /// Discard everything and return to `AwaitingOpportunity`. Never rejected.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.handle(Event::Reset).unwrap_or_default()
    }

    /// # Errors
    ///
    /// `StaleResult` unless `token` names the outstanding ingestion.
    pub fn finish_ingestion(
        &mut self,
        token: OperationToken,
        result: Result<OpportunityRecord, IngestionError>,
    ) -> Result<Vec<Effect>, SessionError> {
        self.handle(Event::IngestionFinished { token, result })
    }

    /// # Errors
    ///
    /// `StaleResult` unless `token` names the outstanding generation.
    pub fn finish_generation(
        &mut self,
        token: OperationToken,
        result: Result<String, GenerationError>,
    ) -> Result<Vec<Effect>, SessionError> {
        self.handle(Event::GenerationFinished { token, result })
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn current_phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn opportunity_record(&self) -> Option<&OpportunityRecord> {
        self.opportunity.as_ref()
    }

    #[must_use]
    pub fn assistant_kind(&self) -> Option<AssistantKind> {
        self.assistant
    }

    #[must_use]
    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn is_operation_pending(&self) -> bool {
        self.tracker.is_pending()
    }

    #[must_use]
    pub fn outstanding_operation(&self) -> Option<AsyncOperation> {
        self.tracker.outstanding()
    }

    pub(crate) fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }
}
