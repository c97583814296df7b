//! PostgreSQL implementation of ConversationRepository.
//!
//! Conversations live in `chats`; their messages in `chat_messages`.
//! The message append and the summary update run in one transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::chat::{Conversation, Message};
use crate::domain::foundation::{ConversationId, ListingId, MessageId, Timestamp, UserId};
use crate::ports::{ConversationRepository, StoreError};

/// PostgreSQL implementation of ConversationRepository.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    /// Creates a new PostgresConversationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO chats (id, listing_id, seller_id, buyer_id, last_message, last_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(conversation.listing_id().as_uuid())
        .bind(conversation.seller_id().as_str())
        .bind(conversation.buyer_id().as_str())
        .bind(conversation.last_message())
        .bind(conversation.last_time().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to insert conversation: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, listing_id, seller_id, buyer_id, last_message, last_time
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to fetch conversation: {}", e)))?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn list_by_listing_and_member(
        &self,
        listing_id: &ListingId,
        member: &UserId,
    ) -> Result<Vec<Conversation>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, listing_id, seller_id, buyer_id, last_message, last_time
            FROM chats
            WHERE listing_id = $1 AND (seller_id = $2 OR buyer_id = $2)
            "#,
        )
        .bind(listing_id.as_uuid())
        .bind(member.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            StoreError::Unavailable(format!("Failed to list listing conversations: {}", e))
        })?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn list_by_member(&self, member: &UserId) -> Result<Vec<Conversation>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, listing_id, seller_id, buyer_id, last_message, last_time
            FROM chats
            WHERE seller_id = $1 OR buyer_id = $1
            ORDER BY last_time DESC
            "#,
        )
        .bind(member.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to list conversations: {}", e)))?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn append_message(
        &self,
        conversation_id: &ConversationId,
        message: &Message,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to start transaction: {}", e)))?;

        // Update the summary first so a missing conversation aborts
        // before the message insert.
        let result = sqlx::query(
            r#"
            UPDATE chats SET last_message = $2, last_time = $3
            WHERE id = $1
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(message.body())
        .bind(message.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to update chat summary: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("conversation", conversation_id));
        }

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, chat_id, sender_id, body, created_at, read)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(conversation_id.as_uuid())
        .bind(message.sender_id().as_str())
        .bind(message.body())
        .bind(message.created_at().as_datetime())
        .bind(message.is_read())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to insert message: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn recent_messages(
        &self,
        conversation_id: &ConversationId,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        self.require_conversation(conversation_id).await?;

        // Newest `limit` rows, then flipped back into ascending order.
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, body, created_at, read
            FROM (
                SELECT id, sender_id, body, created_at, read
                FROM chat_messages
                WHERE chat_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) newest
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to fetch messages: {}", e)))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn unread_messages(
        &self,
        conversation_id: &ConversationId,
        reader: &UserId,
    ) -> Result<Vec<MessageId>, StoreError> {
        self.require_conversation(conversation_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT id FROM chat_messages
            WHERE chat_id = $1 AND sender_id <> $2 AND read = FALSE
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(reader.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to scan unread messages: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| MessageId::from_uuid(row.get("id")))
            .collect())
    }

    async fn mark_message_read(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages SET read = TRUE
            WHERE id = $1 AND chat_id = $2
            "#,
        )
        .bind(message_id.as_uuid())
        .bind(conversation_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to mark message read: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("message", message_id));
        }

        Ok(())
    }
}

impl PostgresConversationRepository {
    async fn require_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), StoreError> {
        let row = sqlx::query("SELECT 1 AS one FROM chats WHERE id = $1")
            .bind(conversation_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to check conversation: {}", e))
            })?;

        if row.is_none() {
            return Err(StoreError::not_found("conversation", conversation_id));
        }
        Ok(())
    }
}

fn row_to_conversation(row: &sqlx::postgres::PgRow) -> Result<Conversation, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let listing_id: uuid::Uuid = row.get("listing_id");
    let seller_id: String = row.get("seller_id");
    let buyer_id: String = row.get("buyer_id");
    let last_message: String = row.get("last_message");
    let last_time: chrono::DateTime<chrono::Utc> = row.get("last_time");

    let seller_id = UserId::new(seller_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt seller_id column: {}", e)))?;
    let buyer_id = UserId::new(buyer_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt buyer_id column: {}", e)))?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        ListingId::from_uuid(listing_id),
        seller_id,
        buyer_id,
        last_message,
        Timestamp::from_datetime(last_time),
    ))
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<Message, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let sender_id: String = row.get("sender_id");
    let body: String = row.get("body");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let read: bool = row.get("read");

    let sender_id = UserId::new(sender_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt sender_id column: {}", e)))?;

    Ok(Message::reconstitute(
        MessageId::from_uuid(id),
        sender_id,
        body,
        Timestamp::from_datetime(created_at),
        read,
    ))
}
