//! Conversation store - threads, ordered messages, read state, feeds.
//!
//! One conversation per (listing, buyer, seller), established lazily on
//! first contact. Messages append in creation order; the parent record
//! mirrors the latest message for inbox views; subscribers receive full
//! snapshots through the [`ChatFeed`].

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::domain::chat::{Conversation, Message, RECENT_MESSAGE_WINDOW};
use crate::domain::foundation::{ConversationId, ListingId, MessageId, Timestamp, UserId, ValidationError};
use crate::ports::{ConversationRepository, StoreError};

use super::feed::{ChatFeed, Subscription};

/// Errors that can occur when sending a message.
#[derive(Debug, Error)]
pub enum SendMessageError {
    /// The body is empty after trimming or exceeds the length limit.
    #[error(transparent)]
    InvalidBody(#[from] ValidationError),

    /// The sender is not one of the conversation's two members.
    #[error("Sender is not a member of this conversation")]
    NotAMember,

    /// The store rejected or could not perform an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service managing conversations, messages, and live feeds.
pub struct ConversationStore<R>
where
    R: ConversationRepository,
{
    conversations: Arc<R>,
    feed: ChatFeed,
}

impl<R> ConversationStore<R>
where
    R: ConversationRepository,
{
    /// Creates a store over the given repository.
    pub fn new(conversations: Arc<R>) -> Self {
        Self {
            conversations,
            feed: ChatFeed::with_default_capacity(),
        }
    }

    /// Creates a store with a specific feed channel capacity (see
    /// [`ChatConfig`](crate::config::ChatConfig)).
    pub fn with_feed_capacity(conversations: Arc<R>, capacity: usize) -> Self {
        Self {
            conversations,
            feed: ChatFeed::new(capacity),
        }
    }

    /// Returns the existing conversation for the triple, or creates one.
    ///
    /// Searches conversations on the listing that contain the buyer and
    /// picks the first whose membership also includes the seller. The
    /// check and the create are separate store calls: two concurrent
    /// openers for the same triple can still race and create two
    /// threads, a limitation carried over from the original design.
    pub async fn open_conversation(
        &self,
        listing_id: ListingId,
        seller_id: UserId,
        buyer_id: UserId,
    ) -> Result<ConversationId, StoreError> {
        let existing = self
            .conversations
            .list_by_listing_and_member(&listing_id, &buyer_id)
            .await?;
        if let Some(found) = existing.iter().find(|c| c.has_member(&seller_id)) {
            return Ok(*found.id());
        }

        let conversation = Conversation::new(listing_id, seller_id, buyer_id, Timestamp::now());
        self.conversations.create(&conversation).await?;

        for member in conversation.members() {
            self.refresh_inbox(member).await;
        }
        Ok(*conversation.id())
    }

    /// Appends a message and mirrors it into the conversation summary.
    ///
    /// Snapshot delivery to subscribers happens after the write and is
    /// best-effort: a failed refresh is logged and the next change
    /// delivers a complete snapshot anyway.
    pub async fn send_message(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<MessageId, SendMessageError> {
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| StoreError::not_found("conversation", conversation_id))?;
        if !conversation.has_member(sender_id) {
            return Err(SendMessageError::NotAMember);
        }

        let message = Message::new(sender_id.clone(), body, Timestamp::now())?;
        let message_id = *message.id();
        self.conversations
            .append_message(conversation_id, &message)
            .await?;

        self.refresh_messages(conversation_id).await;
        for member in conversation.members() {
            self.refresh_inbox(member).await;
        }
        Ok(message_id)
    }

    /// Subscribes to the conversation's message window.
    ///
    /// The current window (ascending creation order, most recent
    /// [`RECENT_MESSAGE_WINDOW`] messages) arrives immediately; every
    /// later change delivers the full updated window. The caller must
    /// eventually drop or [`unsubscribe`](Subscription::unsubscribe)
    /// the handle, or the subscription lives for the rest of the
    /// process.
    pub async fn subscribe_to_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Subscription<Vec<Message>>, StoreError> {
        let initial = self
            .conversations
            .recent_messages(conversation_id, RECENT_MESSAGE_WINDOW)
            .await?;
        Ok(self.feed.subscribe_messages(conversation_id, initial).await)
    }

    /// Marks every unread message not sent by `reader` as read.
    ///
    /// The flips are independent writes; one failing is logged and
    /// skipped rather than rolled back, since the read flag is advisory.
    /// Returns the number of messages actually flipped.
    pub async fn mark_messages_as_read(
        &self,
        conversation_id: &ConversationId,
        reader: &UserId,
    ) -> Result<usize, StoreError> {
        let unread = self
            .conversations
            .unread_messages(conversation_id, reader)
            .await?;

        let mut flipped = 0;
        for message_id in unread {
            match self
                .conversations
                .mark_message_read(conversation_id, &message_id)
                .await
            {
                Ok(()) => flipped += 1,
                Err(err) => warn!(
                    conversation = %conversation_id,
                    message = %message_id,
                    "failed to mark message read: {err}"
                ),
            }
        }

        if flipped > 0 {
            self.refresh_messages(conversation_id).await;
        }
        Ok(flipped)
    }

    /// Subscribes to the user's inbox: every conversation they belong
    /// to, ordered by `last_time` descending.
    pub async fn subscribe_to_inbox(
        &self,
        user_id: &UserId,
    ) -> Result<Subscription<Vec<Conversation>>, StoreError> {
        let initial = self.conversations.list_by_member(user_id).await?;
        Ok(self.feed.subscribe_inbox(user_id, initial).await)
    }

    async fn refresh_messages(&self, conversation_id: &ConversationId) {
        match self
            .conversations
            .recent_messages(conversation_id, RECENT_MESSAGE_WINDOW)
            .await
        {
            Ok(snapshot) => self.feed.publish_messages(conversation_id, snapshot).await,
            Err(err) => warn!(
                conversation = %conversation_id,
                "failed to refresh message feed: {err}"
            ),
        }
    }

    async fn refresh_inbox(&self, member: &UserId) {
        match self.conversations.list_by_member(member).await {
            Ok(snapshot) => self.feed.publish_inbox(member, snapshot).await,
            Err(err) => warn!(member = %member, "failed to refresh inbox feed: {err}"),
        }
    }
}
