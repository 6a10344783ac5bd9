//! Shared board model and JSON codec for the message-board HTTP API.
//!
//! This crate owns the wire representation exchanged with the board server:
//! a `GET` returns a [`Board`] snapshot, a `POST` carries a [`Message`].
//! Timestamps stay as the server's ISO-8601 strings; interpreting them is a
//! presentation concern left to the client.

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_board`] and [`encode_message`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The response body is not a valid board document.
    #[error("failed to decode board: {0}")]
    Decode(#[source] serde_json::Error),
    /// The outgoing message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A message as submitted by a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the author.
    pub user: String,
    /// Message body, sent verbatim.
    pub content: String,
}

impl Message {
    /// Build an outgoing message.
    #[must_use]
    pub fn new(user: impl Into<String>, content: impl Into<String>) -> Self {
        Self { user: user.into(), content: content.into() }
    }
}

/// A message as stored and returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Display name of the author.
    pub user: String,
    /// Message body.
    pub content: String,
    /// Time the server received the message (ISO-8601).
    pub time: String,
}

/// Full snapshot of the message board returned by a `GET`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Title of the board.
    pub title: String,
    /// Server time at which the snapshot was taken (ISO-8601).
    pub time: String,
    /// Time the server was started, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Messages in server order.
    pub messages: Vec<StoredMessage>,
}

/// Decode a `GET` response body into a board snapshot.
///
/// Unknown fields are ignored so newer servers stay readable.
///
/// # Errors
///
/// Returns [`WireError::Decode`] for malformed JSON or missing required fields.
pub fn decode_board(bytes: &[u8]) -> Result<Board, WireError> {
    serde_json::from_slice(bytes).map_err(WireError::Decode)
}

/// Encode a message into a `POST` request body.
///
/// # Errors
///
/// Returns [`WireError::Encode`] if serialization fails.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(message).map_err(WireError::Encode)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
