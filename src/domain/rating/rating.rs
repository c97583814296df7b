//! Rating entity - a buyer's evaluation of a seller for one transaction.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, RatingId, Timestamp, UserId, ValidationError};

use super::Stars;

/// Maximum length of an optional rating comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// A single buyer-to-seller rating tied to one listing transaction.
///
/// # Invariants
///
/// - At most one rating exists per `(seller, buyer, listing)` triple;
///   the ledger enforces this with an existence check before insert.
/// - All fields are immutable after creation; ratings are never updated
///   or deleted by normal application flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    id: RatingId,
    seller_id: UserId,
    buyer_id: UserId,
    listing_id: ListingId,
    stars: Stars,
    comment: Option<String>,
    created_at: Timestamp,
}

impl Rating {
    /// Creates a new rating with a validated comment.
    ///
    /// The comment is trimmed; an empty or whitespace-only comment is
    /// stored as `None`. `created_at` is stamped by the store at write
    /// time, so construction takes it from the caller (the adapter).
    ///
    /// # Errors
    ///
    /// - `TooLong` if the trimmed comment exceeds [`MAX_COMMENT_LENGTH`]
    pub fn new(
        seller_id: UserId,
        buyer_id: UserId,
        listing_id: ListingId,
        stars: Stars,
        comment: Option<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let comment = match comment {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    let count = trimmed.chars().count();
                    if count > MAX_COMMENT_LENGTH {
                        return Err(ValidationError::too_long(
                            "comment",
                            MAX_COMMENT_LENGTH,
                            count,
                        ));
                    }
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        Ok(Self {
            id: RatingId::new(),
            seller_id,
            buyer_id,
            listing_id,
            stars,
            comment,
            created_at,
        })
    }

    /// Reconstitutes a rating from persistence (no validation).
    pub fn reconstitute(
        id: RatingId,
        seller_id: UserId,
        buyer_id: UserId,
        listing_id: ListingId,
        stars: Stars,
        comment: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            seller_id,
            buyer_id,
            listing_id,
            stars,
            comment,
            created_at,
        }
    }

    /// Returns the rating ID.
    pub fn id(&self) -> &RatingId {
        &self.id
    }

    /// Returns the rated seller.
    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    /// Returns the buyer who submitted the rating.
    pub fn buyer_id(&self) -> &UserId {
        &self.buyer_id
    }

    /// Returns the listing the transaction was for.
    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    /// Returns the star value.
    pub fn stars(&self) -> Stars {
        self.stars
    }

    /// Returns the optional comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns when the rating was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}
