//! Live snapshot fan-out for chat subscribers.
//!
//! Implements the store's live-query contract in-process: a subscriber
//! receives the current full result set immediately, then the full
//! updated result set after every change, until it unsubscribes.
//!
//! Rooms are organized per conversation (message feeds) and per user
//! (inbox feeds):
//!
//! ```text
//! Room: conversation-123   Room: inbox/user-a
//! ├── window-1             └── navbar badge
//! └── window-2
//! ```

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};

use crate::domain::chat::{Conversation, Message};
use crate::domain::foundation::{ConversationId, UserId};

/// A live subscription handle.
///
/// Yields the snapshot that was current at subscribe time first, then
/// every snapshot published afterwards. Dropping the handle (or calling
/// [`unsubscribe`](Subscription::unsubscribe)) guarantees no further
/// deliveries; holding it without receiving keeps the room alive, so
/// callers must eventually let go.
pub struct Subscription<T> {
    initial: Option<T>,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    fn new(initial: T, receiver: broadcast::Receiver<T>) -> Self {
        Self {
            initial: Some(initial),
            receiver,
        }
    }

    /// Receives the next snapshot, or `None` once the feed is closed.
    ///
    /// A subscriber that falls behind skips straight to the newest
    /// snapshot: every delivery is a full result set, so intermediate
    /// ones carry no extra information.
    pub async fn recv(&mut self) -> Option<T> {
        if let Some(snapshot) = self.initial.take() {
            return Some(snapshot);
        }
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Stops receiving updates and releases the room slot.
    pub fn unsubscribe(self) {}
}

/// Fan-out registry for message and inbox snapshots.
///
/// Uses `RwLock` around the room maps since publishes (reads of the
/// map) vastly outnumber subscribes and unsubscribes. Rooms with no
/// remaining receivers are cleaned up on the next publish.
pub struct ChatFeed {
    message_rooms: RwLock<HashMap<ConversationId, broadcast::Sender<Vec<Message>>>>,
    inbox_rooms: RwLock<HashMap<UserId, broadcast::Sender<Vec<Conversation>>>>,
    channel_capacity: usize,
}

impl ChatFeed {
    /// Creates a feed with the given per-room channel capacity.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            message_rooms: RwLock::new(HashMap::new()),
            inbox_rooms: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Creates a feed with the default capacity (128 snapshots).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Joins the message room for a conversation.
    pub(crate) async fn subscribe_messages(
        &self,
        conversation_id: &ConversationId,
        initial: Vec<Message>,
    ) -> Subscription<Vec<Message>> {
        let mut rooms = self.message_rooms.write().await;
        let sender = rooms.entry(*conversation_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });
        Subscription::new(initial, sender.subscribe())
    }

    /// Joins the inbox room for a user.
    pub(crate) async fn subscribe_inbox(
        &self,
        user_id: &UserId,
        initial: Vec<Conversation>,
    ) -> Subscription<Vec<Conversation>> {
        let mut rooms = self.inbox_rooms.write().await;
        let sender = rooms.entry(user_id.clone()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });
        Subscription::new(initial, sender.subscribe())
    }

    /// Publishes a message snapshot to a conversation's room.
    ///
    /// A room whose last receiver has gone is removed here.
    pub(crate) async fn publish_messages(
        &self,
        conversation_id: &ConversationId,
        snapshot: Vec<Message>,
    ) {
        let delivered = {
            let rooms = self.message_rooms.read().await;
            match rooms.get(conversation_id) {
                Some(sender) => sender.send(snapshot).is_ok(),
                None => return,
            }
        };
        if !delivered {
            self.message_rooms.write().await.remove(conversation_id);
        }
    }

    /// Publishes an inbox snapshot to a user's room.
    pub(crate) async fn publish_inbox(&self, user_id: &UserId, snapshot: Vec<Conversation>) {
        let delivered = {
            let rooms = self.inbox_rooms.read().await;
            match rooms.get(user_id) {
                Some(sender) => sender.send(snapshot).is_ok(),
                None => return,
            }
        };
        if !delivered {
            self.inbox_rooms.write().await.remove(user_id);
        }
    }
}
