//! Session phase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the opportunity workflow. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for an opportunity reference
    #[default]
    AwaitingOpportunity,
    /// Ingestion request in flight
    IngestingOpportunity,
    /// Opportunity loaded, no assistant chosen yet
    SelectingAssistant,
    /// Assistant chosen, turn-based conversation
    Conversing,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::AwaitingOpportunity => "awaiting_opportunity",
            SessionPhase::IngestingOpportunity => "ingesting_opportunity",
            SessionPhase::SelectingAssistant => "selecting_assistant",
            SessionPhase::Conversing => "conversing",
        }
    }

    /// Whether an opportunity record is available in this phase
    #[must_use]
    pub fn has_opportunity(self) -> bool {
        matches!(
            self,
            SessionPhase::SelectingAssistant | SessionPhase::Conversing
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
