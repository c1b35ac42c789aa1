//! Canned collaborators for demos and local development
//!
//! They stand in for the real scraping and drafting services: ingestion
//! always yields the same sample notice, generation answers with a fixed
//! draft per assistant kind. Both wait a configurable delay first so the
//! in-progress states are visible.

use super::{GenerationAdapter, GenerationError, IngestionAdapter, IngestionError};
use crate::session::{AssistantKind, Message, OpportunityRecord, Role};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_INGESTION_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_GENERATION_DELAY: Duration = Duration::from_secs(2);

/// The sample notice served by [`FixtureIngestion`]
#[must_use]
pub fn sample_opportunity() -> OpportunityRecord {
    OpportunityRecord::new(
        "Cloud Migration Services for Department of Defense",
        "Department of Defense",
    )
    .with_solicitation_number("DOD-2025-CMS-001")
    .with_response_due_date("April 15, 2025")
    .with_description(
        "This opportunity seeks cloud migration services to transition legacy systems to a secure cloud environment with FedRAMP High certification.",
    )
    .with_requirements([
        "Experience with FedRAMP High compliance",
        "Minimum 5 years of DoD cloud migration experience",
        "Security clearance requirements for key personnel",
        "Agile methodology implementation",
    ])
}

/// Ingestion that answers every http(s) reference with one fixed record
pub struct FixtureIngestion {
    delay: Duration,
    record: OpportunityRecord,
}

impl FixtureIngestion {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            record: sample_opportunity(),
        }
    }

    #[must_use]
    pub fn with_record(mut self, record: OpportunityRecord) -> Self {
        self.record = record;
        self
    }
}

impl Default for FixtureIngestion {
    fn default() -> Self {
        Self::new(DEFAULT_INGESTION_DELAY)
    }
}

#[async_trait]
impl IngestionAdapter for FixtureIngestion {
    async fn fetch(&self, reference: &str) -> Result<OpportunityRecord, IngestionError> {
        tokio::time::sleep(self.delay).await;

        if !(reference.starts_with("https://") || reference.starts_with("http://")) {
            return Err(IngestionError::rejected(format!(
                "not an opportunity URL: {reference}"
            )));
        }
        Ok(self.record.clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Generation that replies with a fixed draft for each assistant kind
pub struct ScriptedGeneration {
    delay: Duration,
}

impl ScriptedGeneration {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn reply_for(kind: AssistantKind) -> &'static str {
        match kind {
            AssistantKind::Rfi => {
                "Based on the RFI requirements, I've drafted the following response that addresses their questions about cloud migration experience:\n\n\
                 Our organization has successfully completed 15+ DoD cloud migrations over the past 8 years, including projects with similar scope to this opportunity. All migrations were completed on schedule and within budget, with zero security incidents during transition periods."
            }
            AssistantKind::SolutionBrief => {
                "Here's a technical solution approach that emphasizes your strengths:\n\n\
                 Our phased migration methodology minimizes disruption while ensuring continuous operation. Phase 1 includes comprehensive assessment and planning, Phase 2 covers data migration with parallel systems, and Phase 3 implements final cutover with performance validation."
            }
            AssistantKind::Proposal => {
                "I've analyzed the requirements and prepared the following proposal components:\n\n\
                 1. Technical Approach: Utilizing our proven 5-step migration framework\n\
                 2. Past Performance: Highlighting 3 similar DoD cloud migrations\n\
                 3. Personnel: Recommending a team structure with 8 key roles\n\
                 4. Pricing: Suggesting a phased pricing model with milestone payments"
            }
        }
    }
}

impl Default for ScriptedGeneration {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_DELAY)
    }
}

#[async_trait]
impl GenerationAdapter for ScriptedGeneration {
    async fn generate(
        &self,
        kind: AssistantKind,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        tokio::time::sleep(self.delay).await;

        if !history.iter().any(|m| m.role == Role::User) {
            return Err(GenerationError::rejected("no user message to answer"));
        }
        Ok(Self::reply_for(kind).to_string())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
