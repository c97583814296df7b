//! In-memory pending-rating repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{ListingId, PendingRatingId, Timestamp, UserId};
use crate::domain::rating::PendingRating;
use crate::ports::{PendingRatingRepository, StoreError};

/// In-memory storage for pending-rating records.
#[derive(Debug, Default)]
pub struct InMemoryPendingRatingRepository {
    records: RwLock<HashMap<PendingRatingId, PendingRating>>,
}

impl InMemoryPendingRatingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of stored records (for test assertions).
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl PendingRatingRepository for InMemoryPendingRatingRepository {
    async fn insert(&self, pending: &PendingRating) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(*pending.id(), pending.clone());
        Ok(())
    }

    async fn list_awaiting_reminder(
        &self,
        max_sent: u32,
    ) -> Result<Vec<PendingRating>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|p| p.reminders_sent() < max_sent)
            .cloned()
            .collect())
    }

    async fn list_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<PendingRating>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|p| p.buyer_id() == buyer_id)
            .cloned()
            .collect())
    }

    async fn record_reminder(
        &self,
        id: &PendingRatingId,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let pending = records
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("pending rating", id))?;
        pending.record_reminder(at);
        Ok(())
    }

    async fn delete_for_transaction(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<(), StoreError> {
        self.records.write().await.retain(|_, p| {
            !(p.seller_id() == seller_id
                && p.buyer_id() == buyer_id
                && p.listing_id() == listing_id)
        });
        Ok(())
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, p| !p.created_at().is_before(&cutoff));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn pending(seller: &str, buyer: &str, listing: ListingId, days_ago: i64) -> PendingRating {
        PendingRating::new(
            listing,
            user(seller),
            user(buyer),
            "Mini fridge",
            "Sam Seller",
            "buyer@berkeley.edu",
            "Bea Buyer",
            Timestamp::now().minus_days(days_ago),
        )
    }

    #[tokio::test]
    async fn list_awaiting_reminder_filters_exhausted_records() {
        let repo = InMemoryPendingRatingRepository::new();
        let fresh = pending("s", "b1", ListingId::new(), 1);
        let mut exhausted = pending("s", "b2", ListingId::new(), 10);
        for _ in 0..3 {
            exhausted.record_reminder(Timestamp::now());
        }
        repo.insert(&fresh).await.unwrap();
        repo.insert(&exhausted).await.unwrap();

        let awaiting = repo.list_awaiting_reminder(3).await.unwrap();

        assert_eq!(awaiting.len(), 1);
        assert_eq!(awaiting[0].id(), fresh.id());
    }

    #[tokio::test]
    async fn record_reminder_updates_the_stored_record() {
        let repo = InMemoryPendingRatingRepository::new();
        let record = pending("s", "b", ListingId::new(), 1);
        repo.insert(&record).await.unwrap();

        repo.record_reminder(record.id(), Timestamp::now())
            .await
            .unwrap();

        let listed = repo.list_by_buyer(&user("b")).await.unwrap();
        assert_eq!(listed[0].reminders_sent(), 1);
    }

    #[tokio::test]
    async fn record_reminder_for_missing_record_is_not_found() {
        let repo = InMemoryPendingRatingRepository::new();

        let result = repo
            .record_reminder(&PendingRatingId::new(), Timestamp::now())
            .await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_for_transaction_removes_only_the_triple() {
        let repo = InMemoryPendingRatingRepository::new();
        let listing = ListingId::new();
        repo.insert(&pending("s", "b", listing, 1)).await.unwrap();
        repo.insert(&pending("s", "b", ListingId::new(), 1))
            .await
            .unwrap();

        repo.delete_for_transaction(&user("s"), &user("b"), &listing)
            .await
            .unwrap();

        assert_eq!(repo.record_count().await, 1);
    }

    #[tokio::test]
    async fn delete_created_before_sweeps_old_records() {
        let repo = InMemoryPendingRatingRepository::new();
        repo.insert(&pending("s", "b1", ListingId::new(), 40))
            .await
            .unwrap();
        repo.insert(&pending("s", "b2", ListingId::new(), 5))
            .await
            .unwrap();

        let removed = repo
            .delete_created_before(Timestamp::now().minus_days(30))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(repo.record_count().await, 1);
    }
}
