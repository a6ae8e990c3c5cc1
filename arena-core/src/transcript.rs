//! Append-only debate transcript.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Author id used for every moderator message.
pub const MODERATOR_ID: &str = "ai";
pub const MODERATOR_NAME: &str = "AI Moderator";

/// Author id and name for comments typed by the local viewer.
pub const VIEWER_ID: &str = "spectator";
pub const VIEWER_NAME: &str = "You (Spectator)";

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    #[serde(rename = "userId")]
    pub author_id: String,
    #[serde(rename = "userName")]
    pub author_name: String,
    #[serde(rename = "message")]
    pub body: String,
    pub timestamp: String,
    #[serde(rename = "side")]
    pub role: Role,
}

/// Messages in arrival order with strictly increasing ids.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a transcript loaded with a match. New ids continue above the
    /// largest existing id, whatever order the history was stored in.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let next_id = messages
            .iter()
            .map(|m| m.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self { messages, next_id }
    }

    /// Append a message and return its freshly assigned id.
    pub fn push(
        &mut self,
        author_id: impl Into<String>,
        author_name: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
        role: Role,
    ) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.messages.push(Message {
            id,
            author_id: author_id.into(),
            author_name: author_name.into(),
            body: body.into(),
            timestamp: timestamp.into(),
            role,
        });
        id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64) -> Message {
        Message {
            id,
            author_id: "user1".to_string(),
            author_name: "Alex Chen".to_string(),
            body: "Opening statement".to_string(),
            timestamp: "10:02 AM".to_string(),
            role: Role::Agree,
        }
    }

    #[test]
    fn ids_increase_in_arrival_order() {
        let mut transcript = Transcript::new();
        let first = transcript.push("user1", "Alex", "one", "10:00 AM", Role::Agree);
        let second = transcript.push("ai", "AI Moderator", "two", "10:00 AM", Role::Ai);
        let third = transcript.push("spectator", "You", "three", "10:01 AM", Role::Spectator);

        assert!(first < second && second < third);
        let bodies: Vec<_> = transcript.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["one", "two", "three"]);
    }

    #[test]
    fn resumed_transcript_continues_above_highest_id() {
        let mut transcript = Transcript::from_messages(vec![message(100), message(3)]);
        let id = transcript.push("user2", "Taylor", "next", "10:20 AM", Role::Disagree);
        assert_eq!(id, 101);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().map(|m| m.id), Some(101));
    }

    #[test]
    fn resuming_at_the_highest_id_does_not_overflow() {
        let transcript = Transcript::from_messages(vec![message(u64::MAX), message(7)]);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().map(|m| m.id), Some(7));
    }

    #[test]
    fn message_uses_bracket_json_field_names() {
        let json = serde_json::to_value(message(1)).unwrap();
        assert_eq!(json["userId"], "user1");
        assert_eq!(json["userName"], "Alex Chen");
        assert_eq!(json["message"], "Opening statement");
        assert_eq!(json["side"], "agree");
    }
}
