//! Server-Sent Events support

use crate::runtime::{SessionSnapshot, SessionUpdate};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the current snapshot, then every update after it
#[must_use]
pub fn sse_stream(
    init: SessionSnapshot,
    updates: tokio::sync::broadcast::Receiver<SessionUpdate>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&init)) });

    let broadcasts = BroadcastStream::new(updates).filter_map(|result| match result {
        Ok(update) => Some(Ok(update_event(&update))),
        Err(e) => {
            // Lagged: the client resyncs from the next snapshot it fetches
            tracing::warn!(error = %e, "SSE subscriber lagged");
            None
        }
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(snapshot: &SessionSnapshot) -> Event {
    let data = json!({
        "type": "init",
        "session": snapshot,
    });
    Event::default().event("init").data(data.to_string())
}

fn update_event(update: &SessionUpdate) -> Event {
    let event_type = match update {
        SessionUpdate::Message { .. } => "message",
        SessionUpdate::PhaseChanged { .. } => "phase_changed",
        SessionUpdate::OperationPending { .. } => "operation_pending",
        SessionUpdate::Rejected { .. } => "rejected",
        SessionUpdate::Reset => "reset",
    };
    let data = serde_json::to_string(update).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event_type).data(data)
}
