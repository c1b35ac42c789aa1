//! Session runtime executor

use super::{RuntimeRequest, SessionSnapshot, SessionUpdate};

use crate::adapters::{GenerationAdapter, IngestionAdapter};
use crate::session::{Effect, Event, OperationToken, Session, SessionError};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Event loop that owns one session and carries out its effects
pub struct SessionRuntime<I, G>
where
    I: IngestionAdapter + 'static,
    G: GenerationAdapter + 'static,
{
    session: Session,
    ingestion: Arc<I>,
    generation: Arc<G>,
    request_rx: mpsc::Receiver<RuntimeRequest>,
    /// Weak so the loop ends once every `SessionHandle` is gone
    completion_tx: mpsc::WeakSender<RuntimeRequest>,
    update_tx: broadcast::Sender<SessionUpdate>,
    /// Cancels the background task of the outstanding operation
    in_flight: Option<(OperationToken, CancellationToken)>,
}

impl<I, G> SessionRuntime<I, G>
where
    I: IngestionAdapter + 'static,
    G: GenerationAdapter + 'static,
{
    #[must_use]
    pub fn new(
        ingestion: I,
        generation: G,
        request_rx: mpsc::Receiver<RuntimeRequest>,
        completion_tx: mpsc::WeakSender<RuntimeRequest>,
        update_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        Self {
            session: Session::new(),
            ingestion: Arc::new(ingestion),
            generation: Arc::new(generation),
            request_rx,
            completion_tx,
            update_tx,
            in_flight: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            ingestion = %self.ingestion.name(),
            generation = %self.generation.name(),
            "Starting session runtime"
        );

        while let Some(request) = self.request_rx.recv().await {
            match request {
                RuntimeRequest::Dispatch { event, reply } => {
                    let outcome = self.process_event(event);
                    if let Some(reply) = reply {
                        let _ = reply.send(outcome);
                    }
                }
                RuntimeRequest::Snapshot { reply } => {
                    let _ = reply.send(SessionSnapshot::of(&self.session));
                }
            }
        }

        if let Some((_, cancel)) = self.in_flight.take() {
            cancel.cancel();
        }
        tracing::info!("Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), SessionError> {
        let event_name = event.name();
        let is_reset = matches!(event, Event::Reset);
        let is_completion = event.is_completion();

        let before_phase = self.session.current_phase();
        let before_len = self.session.message_log().len();
        let before_pending = self.session.is_operation_pending();

        let effects = match self.session.handle(event) {
            Ok(effects) => effects,
            Err(e) if !e.is_user_facing() => {
                tracing::debug!(error = %e, "Discarding stale completion");
                return Err(e);
            }
            Err(e) => {
                tracing::info!(event = event_name, phase = %before_phase, error = %e, "Command rejected");
                let _ = self.update_tx.send(SessionUpdate::Rejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if is_completion {
            self.in_flight = None;
        }

        let phase = self.session.current_phase();
        tracing::debug!(event = event_name, from = %before_phase, to = %phase, "Session transition");

        // Subscribers see the reset first, then the new state
        if is_reset {
            let _ = self.update_tx.send(SessionUpdate::Reset);
        } else {
            for message in self.session.message_log().all().iter().skip(before_len) {
                let _ = self.update_tx.send(SessionUpdate::Message {
                    message: message.clone(),
                });
            }
        }
        if phase != before_phase {
            let _ = self.update_tx.send(SessionUpdate::PhaseChanged { phase });
        }
        let pending = self.session.is_operation_pending();
        if pending != before_pending {
            let _ = self
                .update_tx
                .send(SessionUpdate::OperationPending { pending });
        }

        for effect in effects {
            self.execute_effect(effect);
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchOpportunity { token, reference } => {
                let cancel = self.track(token);
                let ingestion = Arc::clone(&self.ingestion);
                let completion_tx = self.completion_tx.clone();

                tokio::spawn(async move {
                    tracing::info!(%token, reference = %reference, "Fetching opportunity (background)");

                    tokio::select! {
                        biased;

                        () = cancel.cancelled() => {
                            tracing::info!(%token, "Ingestion abandoned");
                        }

                        result = ingestion.fetch(&reference) => {
                            post_completion(&completion_tx, Event::IngestionFinished { token, result }).await;
                        }
                    }
                });
            }

            Effect::GenerateReply { token, kind } => {
                let cancel = self.track(token);
                let generation = Arc::clone(&self.generation);
                let completion_tx = self.completion_tx.clone();
                // Committed history, including the user message that triggered this
                let history = self.session.message_log().snapshot();

                tokio::spawn(async move {
                    tracing::info!(%token, assistant = %kind, history_len = history.len(), "Generating reply (background)");

                    tokio::select! {
                        biased;

                        () = cancel.cancelled() => {
                            tracing::info!(%token, "Generation abandoned");
                        }

                        result = generation.generate(kind, &history) => {
                            post_completion(&completion_tx, Event::GenerationFinished { token, result }).await;
                        }
                    }
                });
            }

            Effect::AbortOperation { token } => {
                if let Some((current, cancel)) = self.in_flight.take() {
                    if current == token {
                        tracing::info!(%token, "Aborting in-flight operation");
                        cancel.cancel();
                    } else {
                        self.in_flight = Some((current, cancel));
                    }
                }
            }
        }
    }

    fn track(&mut self, token: OperationToken) -> CancellationToken {
        let cancel = CancellationToken::new();
        self.in_flight = Some((token, cancel.clone()));
        cancel
    }
}

/// Hand a collaborator result back to the runtime loop, if it is still running
async fn post_completion(completion_tx: &mpsc::WeakSender<RuntimeRequest>, event: Event) {
    let Some(tx) = completion_tx.upgrade() else {
        tracing::debug!(event = event.name(), "Runtime gone, dropping completion");
        return;
    };
    let _ = tx
        .send(RuntimeRequest::Dispatch { event, reply: None })
        .await;
}
