//! Chat message and sequence types.

use serde::{Deserialize, Serialize};

/// Who spoke a given message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// The caller's turn.
    User,
    /// A prior oracle response, for multi-turn context.
    Assistant,
}

/// One turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who spoke.
    pub role: Role,
    /// What they said.
    pub content: String,
}

impl Message {
    /// Builds a user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Builds an assistant-role message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered conversation, optionally preceded by a system prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSequence {
    /// System-level instructions, sent once per request.
    pub system: Option<String>,
    /// Turns in order.
    pub messages: Vec<Message>,
}

impl ChatSequence {
    /// Builds a single-turn sequence from one piece of user content.
    #[must_use]
    pub fn single_turn(content: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![Message::user(content)],
        }
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Appends a turn.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_turn_has_one_user_message() {
        let seq = ChatSequence::single_turn("hello");
        assert_eq!(seq.messages.len(), 1);
        assert_eq!(seq.messages[0].role, Role::User);
    }

    #[test]
    fn builder_chains_system_and_messages() {
        let seq = ChatSequence::single_turn("first")
            .with_system("be terse")
            .with_message(Message::assistant("ack"));
        assert_eq!(seq.system.as_deref(), Some("be terse"));
        assert_eq!(seq.messages.len(), 2);
    }
}
