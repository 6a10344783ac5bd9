//! Polling chat client for a shared message board.
//!
//! The client periodically fetches the board (title, server time, ordered
//! messages) from an HTTP endpoint, renders it, and posts messages under a
//! locally chosen user name. After every post it re-fetches once so the new
//! message shows up without waiting for the next poll.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | API URL resolution and typed client configuration |
//! | [`identity`] | Generated start names and user-name validation |
//! | [`compose`] | Outgoing message gate (invalid name or empty content) |
//! | [`sync`] | `BoardApi` transport seam, HTTP client, post-then-refresh policy |
//! | [`poller`] | Cancellable background polling task |
//! | [`render`] | View state, message rows, terminal frame |
//! | [`session`] | Line-based chat session tying the above together |

pub mod compose;
pub mod config;
pub mod identity;
pub mod poller;
pub mod render;
pub mod session;
pub mod sync;

pub use wire::{Board, Message, StoredMessage};
