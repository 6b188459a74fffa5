//! Conversation turn value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person trying on a style.
    User,
    /// The AI stylist.
    Assistant,
}

/// A single turn in a styling conversation.
///
/// Immutable once appended; ordering is conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: TurnRole,
    text: String,
    at: Timestamp,
}

impl ConversationTurn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            at: Timestamp::now(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            at: Timestamp::now(),
        }
    }

    /// Returns who produced the turn.
    pub fn role(&self) -> TurnRole {
        self.role
    }

    /// Returns the turn text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the turn was appended.
    pub fn at(&self) -> &Timestamp {
        &self.at
    }
}
