//! Scripted [`BoardApi`] double shared by sync, poller, and session tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use wire::{Board, Message, StoredMessage};

use super::{BoardApi, SyncError};

/// A call observed by [`MockApi`], in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Fetch,
    Post(Message),
}

struct ScriptedFetch {
    delay: Duration,
    result: Result<Board, SyncError>,
}

/// Returns scripted fetch/post results, then falls back to `default_board`
/// and successful posts.
pub(crate) struct MockApi {
    default_board: Board,
    fetches: Mutex<VecDeque<ScriptedFetch>>,
    /// `None` scripts a post that never completes.
    posts: Mutex<VecDeque<Option<Result<(), SyncError>>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockApi {
    pub(crate) fn new(default_board: Board) -> Self {
        Self {
            default_board,
            fetches: Mutex::new(VecDeque::new()),
            posts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_fetch(&self, result: Result<Board, SyncError>) {
        self.push_delayed_fetch(Duration::ZERO, result);
    }

    pub(crate) fn push_delayed_fetch(&self, delay: Duration, result: Result<Board, SyncError>) {
        self.fetches
            .lock()
            .expect("mock mutex should lock")
            .push_back(ScriptedFetch { delay, result });
    }

    pub(crate) fn push_post(&self, result: Result<(), SyncError>) {
        self.posts.lock().expect("mock mutex should lock").push_back(Some(result));
    }

    /// The next post is accepted but never answered.
    pub(crate) fn push_hanging_post(&self) {
        self.posts.lock().expect("mock mutex should lock").push_back(None);
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("mock mutex should lock").clone()
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, ApiCall::Fetch)).count()
    }

    pub(crate) fn post_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, ApiCall::Post(_))).count()
    }
}

#[async_trait::async_trait]
impl BoardApi for MockApi {
    async fn fetch_board(&self) -> Result<Board, SyncError> {
        self.calls.lock().expect("mock mutex should lock").push(ApiCall::Fetch);
        let scripted = self.fetches.lock().expect("mock mutex should lock").pop_front();
        match scripted {
            Some(ScriptedFetch { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(self.default_board.clone()),
        }
    }

    async fn post_message(&self, message: &Message) -> Result<(), SyncError> {
        self.calls
            .lock()
            .expect("mock mutex should lock")
            .push(ApiCall::Post(message.clone()));
        let scripted = self.posts.lock().expect("mock mutex should lock").pop_front();
        match scripted {
            Some(Some(result)) => result,
            Some(None) => std::future::pending().await,
            None => Ok(()),
        }
    }
}

pub(crate) fn stored(user: &str, content: &str, time: &str) -> StoredMessage {
    StoredMessage { user: user.to_owned(), content: content.to_owned(), time: time.to_owned() }
}

/// The `Room` board used across tests: one message from alice.
pub(crate) fn room_board() -> Board {
    Board {
        title: "Room".to_owned(),
        time: "2024-01-01T10:00:00Z".to_owned(),
        started_at: None,
        messages: vec![stored("alice", "hi", "2024-01-01T09:59:00Z")],
    }
}

pub(crate) fn board_titled(title: &str) -> Board {
    Board { title: title.to_owned(), ..room_board() }
}
