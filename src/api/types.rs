//! API request and response types

use crate::session::AssistantKind;
use serde::{Deserialize, Serialize};

/// Request to submit an opportunity reference
#[derive(Debug, Deserialize)]
pub struct SubmitOpportunityRequest {
    pub reference: String,
}

/// Request to pick an assistant
#[derive(Debug, Deserialize)]
pub struct SelectAssistantRequest {
    pub kind: String,
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Response for an accepted command
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

/// One entry of the assistant catalogue
#[derive(Debug, Serialize)]
pub struct AssistantInfo {
    pub kind: AssistantKind,
    pub display_name: &'static str,
    pub description: &'static str,
}

impl From<AssistantKind> for AssistantInfo {
    fn from(kind: AssistantKind) -> Self {
        Self {
            kind,
            display_name: kind.display_name(),
            description: kind.description(),
        }
    }
}

/// Response for the assistant catalogue
#[derive(Debug, Serialize)]
pub struct AssistantsResponse {
    pub assistants: Vec<AssistantInfo>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
