//! Incoming message events — parent-in-child design.
//!
//! # Hierarchy
//!
//! ```text
//! MessageEvent { time, self_id, message_id, user_id, message, raw_message, sender }
//! ├── PrivateMessageEvent { sub_type, temp_source }
//! └── GroupMessageEvent   { group_id, sub_type }
//! ```
//!
//! Each child embeds its parent via `#[serde(flatten)]` and `Deref`s to
//! it, so `group_event.user_id` and `group_event.group_id` both work
//! transparently. [`IncomingMessage::parse`] inspects the raw JSON's type
//! discriminators and constructs the most specific event.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::chain::MessageChain;
use crate::error::EventError;

// ============================================================================
// Shared Types
// ============================================================================

/// Message sender information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Group card (group nickname).
    #[serde(default)]
    pub card: Option<String>,
    /// Group role ("owner", "admin", "member").
    #[serde(default)]
    pub role: Option<String>,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
}

// ============================================================================
// MessageEvent — fields common to all message events
// ============================================================================

/// A message event with the fields shared by private and group messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Unix timestamp when the event occurred.
    pub time: i64,
    /// Bot's QQ ID.
    pub self_id: i64,
    /// Message ID, usable as a reply target.
    pub message_id: i32,
    /// Sender's user ID.
    pub user_id: i64,
    /// Message content; the gateway delivers either a segment array or a
    /// raw string, both of which deserialize into a chain.
    pub message: MessageChain,
    /// Raw message string as the gateway rendered it.
    #[serde(default)]
    pub raw_message: String,
    /// Font (usually 0).
    #[serde(default)]
    pub font: i32,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
    /// Message type discriminator (kept for serde round-trip).
    #[serde(default)]
    pub message_type: String,
}

impl MessageEvent {
    /// Concatenated content of the message's text segments.
    pub fn plain_text(&self) -> String {
        self.message.extract_plain_text()
    }
}

// ============================================================================
// PrivateMessageEvent
// ============================================================================

/// A private message event. `Deref`s to [`MessageEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateMessageEvent {
    /// Embedded common message fields.
    #[serde(flatten)]
    pub parent: MessageEvent,

    /// Sub-type ("friend", "group", "other").
    #[serde(default)]
    pub sub_type: String,
    /// Temp source group (for temp conversations).
    #[serde(default)]
    pub temp_source: Option<i64>,
}

impl Deref for PrivateMessageEvent {
    type Target = MessageEvent;

    fn deref(&self) -> &MessageEvent {
        &self.parent
    }
}

impl DerefMut for PrivateMessageEvent {
    fn deref_mut(&mut self) -> &mut MessageEvent {
        &mut self.parent
    }
}

// ============================================================================
// GroupMessageEvent
// ============================================================================

/// A group message event. `Deref`s to [`MessageEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMessageEvent {
    /// Embedded common message fields.
    #[serde(flatten)]
    pub parent: MessageEvent,

    /// Group ID.
    pub group_id: i64,
    /// Sub-type ("normal", "anonymous", "notice").
    #[serde(default)]
    pub sub_type: String,
}

impl Deref for GroupMessageEvent {
    type Target = MessageEvent;

    fn deref(&self) -> &MessageEvent {
        &self.parent
    }
}

impl DerefMut for GroupMessageEvent {
    fn deref_mut(&mut self) -> &mut MessageEvent {
        &mut self.parent
    }
}

// ============================================================================
// IncomingMessage — parse dispatch
// ============================================================================

/// An incoming message event, parsed to its most specific type.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A private message.
    Private(PrivateMessageEvent),
    /// A group message.
    Group(GroupMessageEvent),
}

impl IncomingMessage {
    /// Parses a raw gateway payload into the most specific message event.
    ///
    /// The payload's `post_type` must be `"message"`; anything else is
    /// rejected so the caller can route it to its own handling.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let post_type = value
            .get("post_type")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if post_type != "message" {
            return Err(EventError::NotAMessage {
                post_type: post_type.to_string(),
            });
        }

        let message_type = value
            .get("message_type")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        match message_type {
            "private" => Ok(IncomingMessage::Private(serde_json::from_value(value)?)),
            "group" => Ok(IncomingMessage::Group(serde_json::from_value(value)?)),
            other => Err(EventError::UnknownMessageType(other.to_string())),
        }
    }

    /// The common message fields, whichever kind this is.
    pub fn common(&self) -> &MessageEvent {
        match self {
            IncomingMessage::Private(event) => event,
            IncomingMessage::Group(event) => event,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn group_payload() -> String {
        r#"{
            "post_type": "message",
            "message_type": "group",
            "time": 1700000000,
            "self_id": 10000,
            "message_id": 42,
            "user_id": 10001000,
            "group_id": 20002000,
            "raw_message": "hello",
            "message": [
                {"type": "at", "data": {"qq": "all"}},
                {"type": "text", "data": {"text": "hello"}}
            ],
            "sender": {"user_id": 10001000, "nickname": "alice", "role": "member"}
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_group_message() {
        let event = IncomingMessage::parse(&group_payload()).unwrap();
        let IncomingMessage::Group(event) = event else {
            panic!("expected a group message");
        };

        assert_eq!(event.group_id, 20002000);
        // Deref gives transparent access to the parent fields.
        assert_eq!(event.user_id, 10001000);
        assert_eq!(event.message_id, 42);
        assert_eq!(event.plain_text(), "hello");
        assert!(event.message.mentions_all());
        assert_eq!(event.sender.nickname.as_deref(), Some("alice"));
    }

    #[test]
    fn test_parse_private_message_with_string_content() {
        let raw = r#"{
            "post_type": "message",
            "message_type": "private",
            "time": 1700000000,
            "self_id": 10000,
            "message_id": 7,
            "user_id": 10001000,
            "raw_message": "ping",
            "message": "ping",
            "sub_type": "friend"
        }"#;
        let event = IncomingMessage::parse(raw).unwrap();
        let IncomingMessage::Private(event) = event else {
            panic!("expected a private message");
        };

        assert_eq!(event.sub_type, "friend");
        assert_eq!(event.message.segments(), &[Segment::text("ping")]);
        assert_eq!(event.message_id, 7);
    }

    #[test]
    fn test_rejects_non_message_events() {
        let raw = r#"{"post_type": "notice", "notice_type": "poke"}"#;
        let err = IncomingMessage::parse(raw).unwrap_err();
        assert!(matches!(err, EventError::NotAMessage { post_type } if post_type == "notice"));
    }

    #[test]
    fn test_rejects_unknown_message_type() {
        let raw = r#"{"post_type": "message", "message_type": "channel"}"#;
        let err = IncomingMessage::parse(raw).unwrap_err();
        assert!(matches!(err, EventError::UnknownMessageType(t) if t == "channel"));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            IncomingMessage::parse("not json"),
            Err(EventError::Json(_))
        ));
    }
}
