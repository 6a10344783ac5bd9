//! Board sync: fetch the board snapshot and post messages.
//!
//! DESIGN
//! ======
//! `BoardApi` is the transport seam: `HttpBoardApi` talks to the server,
//! tests substitute a scripted double. `BoardSync` layers the client policy
//! on top: failures are logged and returned (never retried), and every post
//! is followed by exactly one refresh whether or not the post succeeded.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here swallows an error. `PostOutcome` carries the post result and
//! the refresh result side by side so callers handle both.

pub mod http;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info, warn};
use wire::{Board, Message};

pub use http::HttpBoardApi;
pub use types::SyncError;

/// Transport for the board endpoint. Enables mocking in tests.
#[async_trait::async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetch the current board snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] for transport failures, non-success statuses,
    /// or undecodable bodies.
    async fn fetch_board(&self) -> Result<Board, SyncError>;

    /// Submit a message.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] for transport failures or non-success statuses.
    async fn post_message(&self, message: &Message) -> Result<(), SyncError>;
}

/// Result of [`BoardSync::post_then_refresh`].
#[derive(Debug)]
pub struct PostOutcome {
    pub posted: Result<(), SyncError>,
    pub board: Result<Board, SyncError>,
}

/// Client sync policy over a [`BoardApi`].
#[derive(Clone)]
pub struct BoardSync {
    api: Arc<dyn BoardApi>,
}

impl BoardSync {
    #[must_use]
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self { api }
    }

    /// Fetch the board once. Failures are logged and returned.
    ///
    /// # Errors
    ///
    /// Propagates the [`SyncError`] from the transport.
    pub async fn refresh(&self) -> Result<Board, SyncError> {
        let result = self.fetch().await;
        if let Err(e) = &result {
            log_failure("board fetch failed", e);
        }
        result
    }

    /// Fetch the board once without logging; the caller reports failures.
    ///
    /// # Errors
    ///
    /// Propagates the [`SyncError`] from the transport.
    pub async fn fetch(&self) -> Result<Board, SyncError> {
        self.api.fetch_board().await
    }

    /// Post a message, then refresh exactly once regardless of the post result.
    pub async fn post_then_refresh(&self, message: &Message) -> PostOutcome {
        let posted = self.api.post_message(message).await;
        if let Err(e) = &posted {
            log_failure("message post failed", e);
        }
        let board = self.refresh().await;
        PostOutcome { posted, board }
    }
}

/// Tracks consecutive identical failures of a repeating fetch, so a server
/// that stays down is reported once rather than on every poll.
#[derive(Debug, Default)]
pub struct FailureStreak {
    last: Option<(&'static str, Option<u16>)>,
    count: u32,
}

impl FailureStreak {
    /// Record a failure. Returns true when it differs from the previous one
    /// and should be surfaced.
    pub fn record_failure(&mut self, err: &SyncError) -> bool {
        let key = (err.error_code(), status_of(err));
        let is_new = self.last != Some(key);
        self.last = Some(key);
        self.count += 1;
        is_new
    }

    /// Record a success. Returns how many failures it ended.
    pub fn record_success(&mut self) -> u32 {
        self.last = None;
        std::mem::take(&mut self.count)
    }

    /// Log a poll result: the first of a run of identical failures at `warn`,
    /// repeats at `debug`, and recovery at `info`.
    pub fn report(&mut self, result: &Result<Board, SyncError>) {
        match result {
            Ok(_) => {
                let failed = self.record_success();
                if failed > 0 {
                    info!(failed_polls = failed, "board fetch recovered");
                }
            }
            Err(e) => {
                if self.record_failure(e) {
                    log_failure("board fetch failed", e);
                } else {
                    debug!(code = e.error_code(), repeats = self.count, "board fetch still failing");
                }
            }
        }
    }
}

fn status_of(err: &SyncError) -> Option<u16> {
    match err {
        SyncError::Status { status, .. } => Some(*status),
        _ => None,
    }
}

fn log_failure(what: &'static str, err: &SyncError) {
    match err {
        SyncError::Status { status, body } => {
            warn!(code = err.error_code(), status, body = %body, "{what}");
        }
        _ => warn!(code = err.error_code(), error = %err, "{what}"),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
