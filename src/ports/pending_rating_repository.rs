//! Pending-rating repository port.

use async_trait::async_trait;

use crate::domain::foundation::{ListingId, PendingRatingId, Timestamp, UserId};
use crate::domain::rating::PendingRating;

use super::StoreError;

/// Repository port for pending-rating reminder records.
#[async_trait]
pub trait PendingRatingRepository: Send + Sync {
    /// Persists a new pending-rating record.
    async fn insert(&self, pending: &PendingRating) -> Result<(), StoreError>;

    /// Lists records with fewer than `max_sent` reminders sent.
    ///
    /// The schedule itself (day offsets, spacing) is evaluated by the
    /// caller; this only pre-filters records that can never be due.
    async fn list_awaiting_reminder(
        &self,
        max_sent: u32,
    ) -> Result<Vec<PendingRating>, StoreError>;

    /// Lists pending ratings for the given buyer.
    async fn list_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<PendingRating>, StoreError>;

    /// Increments the record's reminder count and stamps the send time.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record doesn't exist
    async fn record_reminder(
        &self,
        id: &PendingRatingId,
        at: Timestamp,
    ) -> Result<(), StoreError>;

    /// Deletes any pending record for the transaction triple.
    ///
    /// A no-op when no record exists.
    async fn delete_for_transaction(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<(), StoreError>;

    /// Deletes records created before the cutoff. Returns the count
    /// removed.
    async fn delete_created_before(&self, cutoff: Timestamp) -> Result<usize, StoreError>;
}
