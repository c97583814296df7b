//! In-memory conversation repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::chat::{Conversation, Message};
use crate::domain::foundation::{ConversationId, ListingId, MessageId, UserId};
use crate::ports::{ConversationRepository, StoreError};

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<ConversationId, Conversation>,
    // Messages per conversation in append (ascending created_at) order.
    messages: HashMap<ConversationId, Vec<Message>>,
}

/// In-memory storage for conversations and their messages.
///
/// A single lock guards both maps, so the message append and the
/// summary update are atomic here, matching the transactional postgres
/// adapter.
#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    inner: RwLock<Inner>,
}

impl InMemoryConversationRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Returns the number of stored conversations (for test assertions).
    pub async fn conversation_count(&self) -> usize {
        self.inner.read().await.conversations.len()
    }

    /// Returns the total message count for a conversation (for test
    /// assertions).
    pub async fn message_count(&self, conversation_id: &ConversationId) -> usize {
        self.inner
            .read()
            .await
            .messages
            .get(conversation_id)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .conversations
            .insert(*conversation.id(), conversation.clone());
        inner.messages.insert(*conversation.id(), Vec::new());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        Ok(self.inner.read().await.conversations.get(id).cloned())
    }

    async fn list_by_listing_and_member(
        &self,
        listing_id: &ListingId,
        member: &UserId,
    ) -> Result<Vec<Conversation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .conversations
            .values()
            .filter(|c| c.listing_id() == listing_id && c.has_member(member))
            .cloned()
            .collect())
    }

    async fn list_by_member(&self, member: &UserId) -> Result<Vec<Conversation>, StoreError> {
        let inner = self.inner.read().await;
        let mut listed: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| c.has_member(member))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.last_time().cmp(a.last_time()));
        Ok(listed)
    }

    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        message: &Message,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let conversation = inner
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::not_found("conversation", conversation_id))?;
        conversation.record_message(message.body(), *message.created_at());
        inner
            .messages
            .entry(*conversation_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.read().await;
        let messages = inner
            .messages
            .get(conversation_id)
            .ok_or_else(|| StoreError::not_found("conversation", conversation_id))?;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages[skip..].to_vec())
    }

    async fn unread_messages(
        &self,
        conversation_id: &ConversationId,
        reader: &UserId,
    ) -> Result<Vec<MessageId>, StoreError> {
        let inner = self.inner.read().await;
        let messages = inner
            .messages
            .get(conversation_id)
            .ok_or_else(|| StoreError::not_found("conversation", conversation_id))?;
        Ok(messages
            .iter()
            .filter(|m| !m.is_read() && m.sender_id() != reader)
            .map(|m| *m.id())
            .collect())
    }

    async fn mark_message_read(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let messages = inner
            .messages
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::not_found("conversation", conversation_id))?;
        let message = messages
            .iter_mut()
            .find(|m| m.id() == message_id)
            .ok_or_else(|| StoreError::not_found("message", message_id))?;
        message.mark_read();
        Ok(())
    }
}
