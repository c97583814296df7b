//! Rating repository port.

use async_trait::async_trait;

use crate::domain::foundation::{ListingId, UserId};
use crate::domain::rating::Rating;

use super::StoreError;

/// Repository port for rating persistence.
///
/// Ratings are insert-only: nothing in normal application flow updates
/// or deletes a rating once written. The store offers no composite
/// unique constraint, so the one-rating-per-transaction rule is enforced
/// by the ledger through [`exists`](RatingRepository::exists) before
/// every insert.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Persists a new rating.
    async fn insert(&self, rating: &Rating) -> Result<(), StoreError>;

    /// Returns true if a rating already exists for the
    /// `(seller, buyer, listing)` triple.
    async fn exists(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, StoreError>;

    /// Returns every rating recorded for the seller, in no particular
    /// order.
    async fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Rating>, StoreError>;
}
