//! Runtime hosting a single session
//!
//! The [`SessionRuntime`] task owns the `Session` and is the only code that
//! mutates it. Callers talk to it through a [`SessionHandle`]; collaborator
//! calls run as background tasks and report back through the same channel,
//! so every transition happens on one task, in arrival order.

mod executor;


pub use executor::SessionRuntime;

use crate::adapters::{GenerationAdapter, IngestionAdapter};
use crate::session::{
    AssistantKind, AsyncOperation, Event, Message, OpportunityRecord, Session, SessionError,
    SessionPhase,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Requests processed by the runtime loop
#[derive(Debug)]
pub enum RuntimeRequest {
    /// Apply an event. Commands carry a reply channel for the rejection, if any.
    Dispatch {
        event: Event,
        reply: Option<oneshot::Sender<Result<(), SessionError>>>,
    },
    /// Read the current state
    Snapshot { reply: oneshot::Sender<SessionSnapshot> },
}

/// Point-in-time copy of everything observable about a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub opportunity: Option<OpportunityRecord>,
    pub assistant: Option<AssistantKind>,
    pub messages: Vec<Message>,
    pub operation_pending: bool,
    pub operation: Option<AsyncOperation>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        Self {
            phase: session.current_phase(),
            opportunity: session.opportunity_record().cloned(),
            assistant: session.assistant_kind(),
            messages: session.message_log().all().to_vec(),
            operation_pending: session.is_operation_pending(),
            operation: session.outstanding_operation(),
        }
    }
}

/// Changes pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    Message { message: Message },
    PhaseChanged { phase: SessionPhase },
    OperationPending { pending: bool },
    Rejected { message: String },
    /// Subscribers must drop everything they hold for the session
    Reset,
}

/// Failure of a call through [`SessionHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rejected(#[from] SessionError),
    #[error("Session runtime has stopped")]
    Stopped,
}

/// Cloneable handle used to drive a running session
#[derive(Clone)]
pub struct SessionHandle {
    request_tx: mpsc::Sender<RuntimeRequest>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    /// Start a runtime with a fresh session on the current tokio runtime
    #[must_use]
    pub fn spawn<I, G>(ingestion: I, generation: G) -> Self
    where
        I: IngestionAdapter + 'static,
        G: GenerationAdapter + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel(32);
        let (update_tx, _) = broadcast::channel(128);

        let runtime = SessionRuntime::new(
            ingestion,
            generation,
            request_rx,
            request_tx.downgrade(),
            update_tx.clone(),
        );
        tokio::spawn(runtime.run());

        Self {
            request_tx,
            update_tx,
        }
    }

    /// Submit a notice reference for ingestion.
    ///
    /// # Errors
    ///
    /// `Rejected` when the session refuses the command, `Stopped` when the
    /// runtime is gone. The same holds for the other commands.
    pub async fn submit_opportunity_reference(
        &self,
        reference: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        self.dispatch(Event::SubmitReference {
            reference: reference.into(),
        })
        .await
    }

    /// # Errors
    ///
    /// See [`Self::submit_opportunity_reference`].
    pub async fn select_assistant(&self, kind: AssistantKind) -> Result<(), RuntimeError> {
        self.dispatch(Event::SelectAssistant { kind }).await
    }

    /// # Errors
    ///
    /// See [`Self::submit_opportunity_reference`].
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.dispatch(Event::SendMessage { text: text.into() }).await
    }

    /// # Errors
    ///
    /// `Stopped` when the runtime is gone; a reset itself is never rejected.
    pub async fn reset(&self) -> Result<(), RuntimeError> {
        self.dispatch(Event::Reset).await
    }

    /// # Errors
    ///
    /// `Stopped` when the runtime is gone.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.request_tx
            .send(RuntimeRequest::Snapshot { reply })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }

    /// Apply an event and wait for the verdict
    ///
    /// # Errors
    ///
    /// `Rejected` with the session's reason, or `Stopped` when the runtime is gone.
    pub async fn dispatch(&self, event: Event) -> Result<(), RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.request_tx
            .send(RuntimeRequest::Dispatch {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        rx.await.map_err(|_| RuntimeError::Stopped)??;
        Ok(())
    }
}
