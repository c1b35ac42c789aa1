//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    AcceptedResponse, AssistantInfo, AssistantsResponse, ErrorResponse, SelectAssistantRequest,
    SendMessageRequest, SubmitOpportunityRequest,
};
use super::AppState;
use crate::runtime::{RuntimeError, SessionSnapshot};
use crate::session::{AssistantKind, SessionError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session state
        .route("/api/session", get(get_session))
        .route("/api/session/stream", get(stream_session))
        // Commands
        .route("/api/session/opportunity", post(submit_opportunity))
        .route("/api/session/assistant", post(select_assistant))
        .route("/api/session/messages", post(send_message))
        .route("/api/session/reset", post(reset_session))
        // Catalogue
        .route("/api/assistants", get(list_assistants))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session State
// ============================================================

async fn get_session(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.session.snapshot().await?))
}

async fn stream_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Subscribe before the snapshot so nothing falls between them
    let updates = state.session.subscribe();
    let snapshot = state.session.snapshot().await?;
    Ok(sse_stream(snapshot, updates))
}

// ============================================================
// Commands
// ============================================================

async fn submit_opportunity(
    State(state): State<AppState>,
    Json(req): Json<SubmitOpportunityRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .session
        .submit_opportunity_reference(req.reference)
        .await?;
    Ok(accepted())
}

async fn select_assistant(
    State(state): State<AppState>,
    Json(req): Json<SelectAssistantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind: AssistantKind = req
        .kind
        .parse()
        .map_err(|e: crate::session::UnknownAssistant| AppError::BadRequest(e.to_string()))?;
    state.session.select_assistant(kind).await?;
    Ok(accepted())
}

async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.session.send_message(req.text).await?;
    Ok(accepted())
}

async fn reset_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.session.reset().await?;
    Ok(accepted())
}

fn accepted() -> (StatusCode, Json<AcceptedResponse>) {
    (StatusCode::ACCEPTED, Json(AcceptedResponse { accepted: true }))
}

// ============================================================
// Catalogue
// ============================================================

async fn list_assistants() -> Json<AssistantsResponse> {
    Json(AssistantsResponse {
        assistants: AssistantKind::ALL
            .into_iter()
            .map(AssistantInfo::from)
            .collect(),
    })
}

async fn get_version() -> &'static str {
    concat!("opportunity-desk ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Rejected(
                e @ (SessionError::ReferenceInvalid | SessionError::EmptyMessage),
            ) => AppError::BadRequest(e.to_string()),
            RuntimeError::Rejected(e) => AppError::Conflict(e.to_string()),
            stopped @ RuntimeError::Stopped => AppError::Internal(stopped.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
