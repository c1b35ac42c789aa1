//! Collaborator adapters
//!
//! The session core never talks to the outside world directly. Opportunity
//! ingestion and reply generation go through these two traits; the runtime
//! calls them and feeds their results back as completion events.

mod error;
mod fixture;
mod http;

pub use error::{FailureKind, GenerationError, IngestionError};
pub use fixture::{
    sample_opportunity, FixtureIngestion, ScriptedGeneration, DEFAULT_GENERATION_DELAY,
    DEFAULT_INGESTION_DELAY,
};
pub use http::{HttpGeneration, HttpIngestion};

use crate::session::{AssistantKind, Message, OpportunityRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Turns an opportunity reference into structured fields.
///
/// Retrying with the same reference must be safe; the core never retries on
/// its own.
#[async_trait]
pub trait IngestionAdapter: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<OpportunityRecord, IngestionError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Produces the next assistant message from the full history
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    async fn generate(
        &self,
        kind: AssistantKind,
        history: &[Message],
    ) -> Result<String, GenerationError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: IngestionAdapter + ?Sized> IngestionAdapter for Arc<T> {
    async fn fetch(&self, reference: &str) -> Result<OpportunityRecord, IngestionError> {
        (**self).fetch(reference).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: GenerationAdapter + ?Sized> GenerationAdapter for Arc<T> {
    async fn generate(
        &self,
        kind: AssistantKind,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        (**self).generate(kind, history).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// Logging wrappers
// ============================================================================

/// Logs duration and outcome of every fetch
pub struct LoggingIngestion<T> {
    inner: T,
}

impl<T: IngestionAdapter> LoggingIngestion<T> {
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: IngestionAdapter> IngestionAdapter for LoggingIngestion<T> {
    async fn fetch(&self, reference: &str) -> Result<OpportunityRecord, IngestionError> {
        let start = Instant::now();
        let result = self.inner.fetch(reference).await;
        let duration = start.elapsed();

        match &result {
            Ok(record) => {
                tracing::info!(
                    adapter = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    title = %record.title,
                    requirements = record.requirements.len(),
                    "Opportunity ingested"
                );
            }
            Err(e) => {
                tracing::warn!(
                    adapter = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Opportunity ingestion failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Logs duration and outcome of every generation
pub struct LoggingGeneration<T> {
    inner: T,
}

impl<T: GenerationAdapter> LoggingGeneration<T> {
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: GenerationAdapter> GenerationAdapter for LoggingGeneration<T> {
    async fn generate(
        &self,
        kind: AssistantKind,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        let start = Instant::now();
        let result = self.inner.generate(kind, history).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    adapter = %self.inner.name(),
                    assistant = %kind,
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    reply_len = reply.len(),
                    "Reply generated"
                );
            }
            Err(e) => {
                tracing::warn!(
                    adapter = %self.inner.name(),
                    assistant = %kind,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Reply generation failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
