//! Conversation entity - one thread per listing and buyer/seller pair.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, ListingId, Timestamp, UserId};

/// A two-party message thread scoped to a single listing.
///
/// # Invariants
///
/// - `members` holds exactly the seller and the buyer
/// - At most one conversation exists per `(listing, {seller, buyer})`;
///   the store enforces this with a lookup before create
/// - `last_message`/`last_time` mirror the most recently sent message
///   (empty string and the creation time until the first send)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: ConversationId,
    listing_id: ListingId,
    members: [UserId; 2],
    seller_id: UserId,
    buyer_id: UserId,
    last_message: String,
    last_time: Timestamp,
}

impl Conversation {
    /// Creates a new conversation with no messages yet.
    pub fn new(
        listing_id: ListingId,
        seller_id: UserId,
        buyer_id: UserId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ConversationId::new(),
            listing_id,
            members: [seller_id.clone(), buyer_id.clone()],
            seller_id,
            buyer_id,
            last_message: String::new(),
            last_time: created_at,
        }
    }

    /// Reconstitutes a conversation from persistence.
    pub fn reconstitute(
        id: ConversationId,
        listing_id: ListingId,
        seller_id: UserId,
        buyer_id: UserId,
        last_message: String,
        last_time: Timestamp,
    ) -> Self {
        Self {
            id,
            listing_id,
            members: [seller_id.clone(), buyer_id.clone()],
            seller_id,
            buyer_id,
            last_message,
            last_time,
        }
    }

    /// Returns true if the user is one of the two members.
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Returns the other member of the conversation, if `user_id` is a
    /// member at all.
    pub fn other_member(&self, user_id: &UserId) -> Option<&UserId> {
        if !self.has_member(user_id) {
            return None;
        }
        self.members.iter().find(|m| *m != user_id)
    }

    /// Mirrors a newly sent message into the denormalized summary.
    pub fn record_message(&mut self, body: &str, at: Timestamp) {
        self.last_message = body.to_string();
        self.last_time = at;
    }

    /// Returns the conversation ID.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the listing this thread is about.
    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    /// Returns both members (seller first).
    pub fn members(&self) -> &[UserId; 2] {
        &self.members
    }

    /// Returns the selling member.
    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    /// Returns the buying member.
    pub fn buyer_id(&self) -> &UserId {
        &self.buyer_id
    }

    /// Returns the body of the most recent message.
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Returns when the most recent message was sent.
    pub fn last_time(&self) -> &Timestamp {
        &self.last_time
    }
}
