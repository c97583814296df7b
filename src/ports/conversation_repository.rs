//! Conversation repository port.
//!
//! Conversations exclusively own their messages: a message is only ever
//! reached through its parent conversation, and has no lifecycle of its
//! own.

use async_trait::async_trait;

use crate::domain::chat::{Conversation, Message};
use crate::domain::foundation::{ConversationId, ListingId, MessageId, UserId};

use super::StoreError;

/// Repository port for conversations and their message subcollections.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Persists a new, empty conversation.
    async fn create(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Finds a conversation by its ID. Returns `None` if absent.
    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Lists conversations for a listing that include the given member.
    ///
    /// Used by the lookup-before-create check; order is unspecified.
    async fn list_by_listing_and_member(
        &self,
        listing_id: &ListingId,
        member: &UserId,
    ) -> Result<Vec<Conversation>, StoreError>;

    /// Lists every conversation that includes the member, ordered by
    /// `last_time` descending (inbox order).
    async fn list_by_member(&self, member: &UserId) -> Result<Vec<Conversation>, StoreError>;

    /// Appends a message and mirrors its body/time into the parent's
    /// `last_message`/`last_time` summary.
    ///
    /// Both writes happen in a single transaction where the backing
    /// store supports one.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation doesn't exist
    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        message: &Message,
    ) -> Result<(), StoreError>;

    /// Returns the most recent `limit` messages in ascending
    /// `created_at` order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation doesn't exist
    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;

    /// Returns the IDs of unread messages not sent by `reader`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation doesn't exist
    async fn unread_messages(
        &self,
        conversation_id: &ConversationId,
        reader: &UserId,
    ) -> Result<Vec<MessageId>, StoreError>;

    /// Flips the read flag on a single message.
    ///
    /// Each flip is an independent write; callers batching flips must
    /// tolerate partial failure.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation or message doesn't exist
    async fn mark_message_read(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError>;
}
