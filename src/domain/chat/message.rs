//! Message entity for conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp, UserId, ValidationError};

/// Maximum length of a chat message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// A message within a conversation.
///
/// # Invariants
///
/// - `body` is non-empty after trimming and within [`MAX_MESSAGE_LENGTH`]
/// - `sender_id`, `body`, and `created_at` never change after creation
/// - `read` starts false and only ever flips to true, by the member who
///   did not send the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    sender_id: UserId,
    body: String,
    created_at: Timestamp,
    read: bool,
}

impl Message {
    /// Creates a new unread message with a validated body.
    ///
    /// The body is trimmed before validation and storage. `created_at`
    /// comes from the store adapter, which stamps it at write time.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the body is empty after trimming
    /// - `TooLong` if the trimmed body exceeds [`MAX_MESSAGE_LENGTH`]
    pub fn new(
        sender_id: UserId,
        body: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let body = body.into();
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("body"));
        }
        let count = trimmed.chars().count();
        if count > MAX_MESSAGE_LENGTH {
            return Err(ValidationError::too_long("body", MAX_MESSAGE_LENGTH, count));
        }

        Ok(Self {
            id: MessageId::new(),
            sender_id,
            body: trimmed.to_string(),
            created_at,
            read: false,
        })
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        sender_id: UserId,
        body: String,
        created_at: Timestamp,
        read: bool,
    ) -> Self {
        Self {
            id,
            sender_id,
            body,
            created_at,
            read,
        }
    }

    /// Flips the advisory read flag. Idempotent.
    pub fn mark_read(&mut self) {
        self.read = true;
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns who sent the message.
    pub fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    /// Returns the message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true once the non-sending member has seen the message.
    pub fn is_read(&self) -> bool {
        self.read
    }
}
