//! Assistant kinds and their fixed welcome texts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The specialized assistant a session converses with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssistantKind {
    #[serde(rename = "rfi")]
    Rfi,
    #[serde(rename = "solution")]
    SolutionBrief,
    #[serde(rename = "proposal")]
    Proposal,
}

impl AssistantKind {
    pub const ALL: [AssistantKind; 3] = [
        AssistantKind::Rfi,
        AssistantKind::SolutionBrief,
        AssistantKind::Proposal,
    ];

    /// Wire name
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            AssistantKind::Rfi => "rfi",
            AssistantKind::SolutionBrief => "solution",
            AssistantKind::Proposal => "proposal",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            AssistantKind::Rfi => "RFI Assistant",
            AssistantKind::SolutionBrief => "Solution Brief Assistant",
            AssistantKind::Proposal => "Proposal Assistant",
        }
    }

    /// Short description of the artifact this assistant drafts
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            AssistantKind::Rfi => "Draft responses to a Request for Information",
            AssistantKind::SolutionBrief => "Create a technical overview of your capabilities",
            AssistantKind::Proposal => "Develop a comprehensive proposal response",
        }
    }

    /// Greeting appended when the assistant is selected
    #[must_use]
    pub fn welcome_message(self) -> &'static str {
        match self {
            AssistantKind::Rfi => {
                "I'm the RFI Assistant. I'll help you draft detailed responses to this Request for Information. What specific questions or requirements would you like to address first?"
            }
            AssistantKind::SolutionBrief => {
                "I'm the Solution Brief Assistant. I'll help you create a technical overview that highlights your capabilities. Let's start by discussing your company's strengths related to this opportunity."
            }
            AssistantKind::Proposal => {
                "I'm the Proposal Assistant. I'll help you develop a comprehensive proposal response. Let's begin by outlining the key requirements and your approach to meeting them."
            }
        }
    }
}

impl fmt::Display for AssistantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Unrecognized assistant name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assistant kind: {0}")]
pub struct UnknownAssistant(pub String);

impl FromStr for AssistantKind {
    type Err = UnknownAssistant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rfi" => Ok(AssistantKind::Rfi),
            "solution" | "solution_brief" | "solution-brief" => Ok(AssistantKind::SolutionBrief),
            "proposal" => Ok(AssistantKind::Proposal),
            _ => Err(UnknownAssistant(s.to_string())),
        }
    }
}
