//! Chat Message Model
//!
//! The concrete message record cached by the binary and the test suite.
//! The cache itself is generic and treats any serializable record as an
//! opaque blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message as persisted by the chat backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the author
    pub sender: String,
    /// Message body
    pub content: String,
    /// Creation time (UTC)
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_round_trip() {
        let message = ChatMessage::new("alice", "hello there");

        let json = serde_json::to_string(&message).unwrap();
        let decoded: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_message_fields() {
        let message = ChatMessage::new("bob", "hi");
        assert_eq!(message.sender, "bob");
        assert_eq!(message.content, "hi");
    }
}
