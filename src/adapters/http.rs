//! HTTP collaborators
//!
//! Both adapters POST JSON to a configured endpoint. The ingestion service
//! answers with an opportunity record, the generation service with
//! `{"content": "..."}`.

use super::{FailureKind, GenerationAdapter, GenerationError, IngestionAdapter, IngestionError};
use crate::session::{AssistantKind, Message, OpportunityRecord, Role};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct IngestionRequest<'a> {
    reference: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    assistant: AssistantKind,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

impl<'a> GenerationRequest<'a> {
    fn new(assistant: AssistantKind, history: &'a [Message]) -> Self {
        Self {
            assistant,
            messages: history
                .iter()
                .map(|m| WireMessage {
                    role: m.role,
                    content: &m.content,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    content: String,
}

/// Decode an extraction service response body
fn parse_record(body: &str) -> Result<OpportunityRecord, IngestionError> {
    serde_json::from_str(body)
        .map_err(|e| IngestionError::decode(format!("Failed to parse opportunity: {e}")))
}

/// Decode a drafting service response body
fn parse_reply(body: &str) -> Result<String, GenerationError> {
    serde_json::from_str::<GenerationResponse>(body)
        .map(|response| response.content)
        .map_err(|e| GenerationError::decode(format!("Failed to parse reply: {e}")))
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Map a transport error onto a failure kind
fn classify_transport(e: &reqwest::Error) -> (FailureKind, String) {
    if e.is_timeout() {
        (FailureKind::Timeout, format!("Request timeout: {e}"))
    } else if e.is_connect() {
        (FailureKind::Network, format!("Connection failed: {e}"))
    } else {
        (FailureKind::Unknown, format!("Request failed: {e}"))
    }
}

/// Map a non-success status onto a failure kind
fn classify_status(status: StatusCode, body: &str) -> (FailureKind, String) {
    let kind = match status.as_u16() {
        408 | 504 => FailureKind::Timeout,
        429 | 502 | 503 => FailureKind::Network,
        400..=499 => FailureKind::Rejected,
        _ => FailureKind::Unknown,
    };
    let detail = body.trim();
    let message = if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    };
    (kind, message)
}

async fn post_json<B: Serialize + Sync>(
    client: &Client,
    endpoint: &str,
    body: &B,
) -> Result<String, (FailureKind, String)> {
    let response = client
        .post(endpoint)
        .json(body)
        .send()
        .await
        .map_err(|e| classify_transport(&e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| (FailureKind::Network, format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        return Err(classify_status(status, &text));
    }
    Ok(text)
}

/// Ingestion backed by a remote extraction service
pub struct HttpIngestion {
    client: Client,
    endpoint: String,
}

impl HttpIngestion {
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl IngestionAdapter for HttpIngestion {
    async fn fetch(&self, reference: &str) -> Result<OpportunityRecord, IngestionError> {
        let body = post_json(&self.client, &self.endpoint, &IngestionRequest { reference })
            .await
            .map_err(|(kind, message)| IngestionError::new(kind, message))?;

        parse_record(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Generation backed by a remote drafting service
pub struct HttpGeneration {
    client: Client,
    endpoint: String,
}

impl HttpGeneration {
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GenerationAdapter for HttpGeneration {
    async fn generate(
        &self,
        kind: AssistantKind,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest::new(kind, history);

        let body = post_json(&self.client, &self.endpoint, &request)
            .await
            .map_err(|(kind, message)| GenerationError::new(kind, message))?;

        parse_reply(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
