//! Chat session: ties view state, the composer, and board sync together.
//!
//! Input is line based. A plain line is a message; `/name <new>` edits the
//! user name; `/quit` ends the session; `//text` sends `/text`. Poll results
//! and post-triggered refreshes both land in the same `BoardView`, last write
//! wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;

use tracing::{debug, info};

use crate::compose::{self, Submission};
use crate::poller::SyncEvent;
use crate::render::BoardView;
use crate::sync::BoardSync;

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Rename(String),
    Quit,
    Unknown(String),
}

/// Parse one line of user input. A leading `//` escapes the command prefix.
#[must_use]
pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line.to_owned());
    };
    if rest.starts_with('/') {
        return Command::Say(rest.to_owned());
    }
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match name {
        "name" => Command::Rename(arg.to_owned()),
        "quit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_owned()),
    }
}

/// What handling a line did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// A post was attempted; `posted` is false when the server or network failed.
    Sent { posted: bool },
    /// The name is invalid; nothing was sent.
    Blocked,
    /// Empty content; nothing was sent.
    Dropped,
    Renamed { valid: bool },
    UnknownCommand(String),
    Quit,
}

pub struct ChatSession {
    view: BoardView,
    sync: BoardSync,
}

impl ChatSession {
    #[must_use]
    pub fn new(view: BoardView, sync: BoardSync) -> Self {
        Self { view, sync }
    }

    #[must_use]
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Apply a poll result. Returns true when the view changed.
    ///
    /// Failures were already logged by the sync layer; the stale board stays.
    pub fn on_event(&mut self, event: SyncEvent) -> bool {
        match event {
            SyncEvent::Board(board) => {
                self.view.apply(board);
                true
            }
            SyncEvent::Failed(e) => {
                debug!(code = e.error_code(), "keeping previous board");
                false
            }
        }
    }

    /// Handle one line of input.
    pub async fn handle_line(&mut self, line: &str) -> InputOutcome {
        match parse_line(line) {
            Command::Say(content) => self.submit(&content).await,
            Command::Rename(name) => {
                let valid = self.view.user_mut().set(&name);
                info!(user = %self.view.user().name(), valid, "user name changed");
                InputOutcome::Renamed { valid }
            }
            Command::Unknown(name) => InputOutcome::UnknownCommand(name),
            Command::Quit => InputOutcome::Quit,
        }
    }

    /// Handle one line unless `cancel` resolves first.
    ///
    /// Returns `None` when cancelled; the in-flight request, if any, is
    /// dropped and the view is left as it was.
    pub async fn handle_line_until<C: Future>(&mut self, line: &str, cancel: C) -> Option<InputOutcome> {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!("input handling cancelled");
                None
            }
            outcome = self.handle_line(line) => Some(outcome),
        }
    }

    /// Submit message content under the current name.
    pub async fn submit(&mut self, content: &str) -> InputOutcome {
        match compose::submit(self.view.user(), content) {
            Submission::Send(message) => {
                let outcome = self.sync.post_then_refresh(&message).await;
                if let Ok(board) = outcome.board {
                    self.view.apply(board);
                }
                InputOutcome::Sent { posted: outcome.posted.is_ok() }
            }
            Submission::Blocked => {
                debug!("send blocked: invalid user name");
                InputOutcome::Blocked
            }
            Submission::Dropped => InputOutcome::Dropped,
        }
    }
}
