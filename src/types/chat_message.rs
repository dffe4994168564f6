use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Placeholder text shown while a reply is in flight.
pub const PENDING_TEXT: &str = "Thinking…";

/// An opaque client-side message identifier.
///
/// Identifiers are generated locally; the agent never sees them. A pending
/// placeholder derives its identifier from the user message it answers, which
/// is how the placeholder is found again when the reply arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a fresh random identifier.
    pub fn fresh() -> Self {
        MessageId(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier of the pending placeholder paired with this
    /// message.
    pub fn pending(&self) -> MessageId {
        MessageId(format!("{}-pending", self.0))
    }

    /// Returns true if this identifier names a pending placeholder.
    pub fn is_pending(&self) -> bool {
        self.0.ends_with("-pending")
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        MessageId(id)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Agent,
}

/// A single transcript entry.
///
/// Messages live only in memory for the lifetime of the session. A pending
/// agent message carries [`PENDING_TEXT`] until the reply text overwrites it
/// in place (refreshing the timestamp), or until a failed submission removes
/// it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Client-generated identifier.
    pub id: MessageId,

    /// Who wrote the message.
    pub author: Author,

    /// Display text.
    pub text: String,

    /// Creation time, refreshed when a placeholder resolves.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    /// Creates a user message with a fresh identifier.
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            id: MessageId::fresh(),
            author: Author::User,
            text: text.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Creates the pending placeholder paired with a user message.
    pub fn pending_for(user_id: &MessageId) -> Self {
        ChatMessage {
            id: user_id.pending(),
            author: Author::Agent,
            text: PENDING_TEXT.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Returns true if this message is an unresolved placeholder.
    pub fn is_pending(&self) -> bool {
        self.author == Author::Agent && self.id.is_pending() && self.text == PENDING_TEXT
    }

    /// Overwrites the placeholder text with the resolved reply and refreshes
    /// the timestamp.
    pub fn resolve(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timestamp = OffsetDateTime::now_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(MessageId::fresh(), MessageId::fresh());
    }

    #[test]
    fn pending_id_derives_from_user_id() {
        let id = MessageId::from("abc123".to_string());
        let pending = id.pending();
        assert_eq!(pending.as_str(), "abc123-pending");
        assert!(pending.is_pending());
        assert!(!id.is_pending());
    }

    #[test]
    fn placeholder_pairs_with_user_message() {
        let user = ChatMessage::user("What schools fit my budget?");
        let placeholder = ChatMessage::pending_for(&user.id);
        assert_eq!(placeholder.id, user.id.pending());
        assert_eq!(placeholder.author, Author::Agent);
        assert_eq!(placeholder.text, PENDING_TEXT);
        assert!(placeholder.is_pending());
    }

    #[test]
    fn resolve_replaces_text_and_clears_pending() {
        let user = ChatMessage::user("hi");
        let mut placeholder = ChatMessage::pending_for(&user.id);
        placeholder.resolve("Here are three options.");
        assert_eq!(placeholder.text, "Here are three options.");
        assert!(!placeholder.is_pending());
    }

    #[test]
    fn author_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Author::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Author::Agent).unwrap(), r#""agent""#);
    }

    #[test]
    fn message_serializes_with_rfc3339_timestamp() {
        let message = ChatMessage {
            id: MessageId::from("m1".to_string()),
            author: Author::User,
            text: "hello".to_string(),
            timestamp: time::macros::datetime!(2025-03-01 12:00:00 UTC),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"id":"m1","author":"user","text":"hello","timestamp":"2025-03-01T12:00:00Z"}"#
        );
    }
}
