use crate::types::ChatMessage;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::debug;

/// Snapshot delivered to feed subscribers.
///
/// `None` means no snapshot has been delivered yet (the subscriber should
/// show its loading state); `Some` always carries the full message list in
/// server-timestamp order.
pub type FeedSnapshot = Option<Vec<ChatMessage>>;

/// Registry of live per-room message feeds.
///
/// Each room has a single `watch` channel: publishing replaces the current
/// snapshot and wakes every subscriber. Dropping a receiver is the
/// unsubscribe; channels with no subscribers are pruned lazily on publish.
#[derive(Debug, Default)]
pub struct ChatFeeds {
    rooms: RwLock<HashMap<String, watch::Sender<FeedSnapshot>>>,
}

impl ChatFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a room's feed.
    ///
    /// The receiver starts at the most recently published snapshot, or at
    /// the loading state when nothing has been published yet.
    pub fn subscribe(&self, room_id: &str) -> watch::Receiver<FeedSnapshot> {
        let mut rooms = self.rooms.write();
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }

    /// Publish the full latest snapshot for a room.
    ///
    /// Messages must already be in server-timestamp order; the feed never
    /// re-sorts. Rooms nobody is watching are dropped from the registry.
    pub fn publish(&self, room_id: &str, messages: Vec<ChatMessage>) {
        let mut rooms = self.rooms.write();

        if let Some(sender) = rooms.get(room_id) {
            if sender.receiver_count() == 0 {
                debug!(room_id, "dropping chat feed with no subscribers");
                rooms.remove(room_id);
                return;
            }
            let _ = sender.send(Some(messages));
        }
    }

    /// Number of rooms with a live channel (diagnostics).
    pub fn active_rooms(&self) -> usize {
        self.rooms.read().len()
    }
}
