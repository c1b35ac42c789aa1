//! Conversation messages and the append-only log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 1-based, gapless within a session
    pub sequence: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered, append-only record of a session's messages.
///
/// There is no edit or delete; the only way to empty the log is to replace the
/// session on reset.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning its sequence number
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> u64 {
        let sequence = self.next_sequence();
        self.entries.push(Message {
            sequence,
            role,
            content: content.into(),
            created_at: Utc::now(),
        });
        sequence
    }

    /// All messages in insertion order
    #[must_use]
    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    /// Immutable copy of the current contents, safe to hand to other tasks
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Message]> {
        Arc::from(self.entries.as_slice())
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number the next append will receive
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.entries.last().map_or(1, |m| m.sequence + 1)
    }
}
