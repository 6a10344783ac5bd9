//! Message composer: decides whether a submitted line becomes a post.

#[cfg(test)]
#[path = "compose_test.rs"]
mod compose_test;

use wire::Message;

use crate::identity::UserField;

/// Result of submitting the compose box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Post this message.
    Send(Message),
    /// The current user name is invalid; sending is disabled.
    Blocked,
    /// Content was empty after trimming; silently ignored.
    Dropped,
}

impl Submission {
    /// True when the submission should reach the network.
    #[must_use]
    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send(_))
    }
}

/// Decide what to do with `content` typed under the given user.
///
/// The user check runs first, so an invalid name blocks even empty input.
/// Content is sent verbatim; trimming only decides emptiness.
#[must_use]
pub fn submit(user: &UserField, content: &str) -> Submission {
    if !user.is_valid() {
        return Submission::Blocked;
    }
    if content.trim().is_empty() {
        return Submission::Dropped;
    }
    Submission::Send(Message::new(user.name(), content))
}
