//! In-process change notifications.
//!
//! Every successful write publishes a [`Change`]. Views that need to refresh
//! subscribe; a slow subscriber loses the oldest changes instead of holding
//! up writers.

use serde::Serialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Change {
    UserUpdated { user_id: String },
    EventUpdated { event_id: String },
    EventDeleted { event_id: String },
    DesignSaved { event_id: String },
    GuestsAdded { event_id: String, count: usize },
    GuestUpdated { event_id: String, guest_id: String },
    GuestDeleted { event_id: String, guest_id: String },
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<Change>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Fire-and-forget; having no subscribers is not an error.
    pub fn publish(&self, change: Change) {
        let _ = self.tx.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

/// Log every change until `shutdown` fires or the feed closes.
pub async fn log_changes(mut rx: broadcast::Receiver<Change>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = rx.recv() => match received {
                Ok(change) => debug!(?change, "change published"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Change logger lagged, skipped {skipped} changes");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    info!("Change logger stopped");
}
