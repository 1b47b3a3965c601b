//! Error types for incoming event parsing.
//!
//! The chain algebra itself is error-transparent (malformed input falls
//! back to a text wrap); parsing raw gateway events is the one surface
//! that can genuinely fail.

use thiserror::Error;

/// Errors that can occur while parsing a raw gateway event.
#[derive(Debug, Error)]
pub enum EventError {
    /// The payload was not valid JSON, or a field had the wrong shape.
    #[error("malformed event payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is a valid event but not a message event.
    #[error("not a message event (post_type: {post_type:?})")]
    NotAMessage {
        /// The `post_type` the gateway reported.
        post_type: String,
    },

    /// The message event carried an unrecognized `message_type`.
    #[error("unknown message type: {0:?}")]
    UnknownMessageType(String),
}
