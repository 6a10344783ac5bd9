//! Poller: background task that refreshes the board on a fixed interval.
//!
//! DESIGN
//! ======
//! One spawned task drives a `tokio::time::interval`. The first tick fires
//! immediately, giving the initial sync on start. Each tick issues one fetch
//! and forwards the outcome as a `SyncEvent` on a bounded channel.
//!
//! At most one fetch is in flight. If a fetch is still pending when the next
//! tick fires, it is dropped (aborting the request) and a fresh one starts, so
//! a hung request costs one cycle and an older response can never overwrite a
//! newer one.
//!
//! Every failure is still delivered as an event, but a run of identical
//! failures is logged at `warn` only once (see `FailureStreak`).
//!
//! SHUTDOWN
//! ========
//! `PollerHandle::stop` flips a `watch` flag and waits for the task. The flag
//! is checked at every suspension point, so an in-flight fetch is dropped and
//! nothing is sent after stop. Dropping the handle has the same effect.

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use wire::Board;

use crate::sync::{BoardSync, FailureStreak, SyncError};

const EVENT_QUEUE_CAPACITY: usize = 16;

/// Outcome of one poll.
#[derive(Debug)]
pub enum SyncEvent {
    Board(Board),
    Failed(SyncError),
}

/// Control handle for a running poller.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling, dropping any in-flight request, and wait for the task.
    pub async fn stop(self) {
        if self.shutdown.send(true).is_err() {
            debug!("poller already finished");
        }
        if let Err(e) = self.task.await {
            debug!(error = %e, "poller task ended abnormally");
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the poller. Events arrive on the returned receiver until stop.
#[must_use]
pub fn spawn_poller(sync: BoardSync, interval: Duration) -> (PollerHandle, mpsc::Receiver<SyncEvent>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

    info!(interval = ?interval, "board polling started");
    let task = tokio::spawn(poll_loop(sync, interval, shutdown_rx, event_tx));

    (PollerHandle { shutdown: shutdown_tx, task }, event_rx)
}

async fn poll_loop(
    sync: BoardSync,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    events: mpsc::Sender<SyncEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;
    let mut failures = FailureStreak::default();

    loop {
        let fetched = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            result = sync.fetch() => Some(result),
            _ = ticker.tick() => None,
        };

        let Some(result) = fetched else {
            debug!("poll superseded by next tick; request dropped");
            continue;
        };

        failures.report(&result);
        let event = match result {
            Ok(board) => SyncEvent::Board(board),
            Err(e) => SyncEvent::Failed(e),
        };
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            sent = events.send(event) => {
                if sent.is_err() {
                    debug!("event receiver dropped");
                    break;
                }
            }
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
    }
    info!("board polling stopped");
}
