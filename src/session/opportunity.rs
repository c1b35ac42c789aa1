//! Ingested opportunity data

use serde::{Deserialize, Serialize};

/// Snapshot of an ingested procurement opportunity.
///
/// Stored once per session on successful ingestion and never edited afterwards.
/// Field names are written in snake case. Extraction services emit camel case
/// (`solicitationNumber`), which is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub title: String,
    pub agency: String,
    #[serde(alias = "solicitationNumber")]
    pub solicitation_number: String,
    #[serde(alias = "responseDueDate", alias = "responseDate")]
    pub response_due_date: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl OpportunityRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, agency: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            agency: agency.into(),
            solicitation_number: String::new(),
            response_due_date: String::new(),
            description: String::new(),
            requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_solicitation_number(mut self, number: impl Into<String>) -> Self {
        self.solicitation_number = number.into();
        self
    }

    #[must_use]
    pub fn with_response_due_date(mut self, date: impl Into<String>) -> Self {
        self.response_due_date = date.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }
}
