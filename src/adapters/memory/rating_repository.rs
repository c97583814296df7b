//! In-memory rating repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ListingId, UserId};
use crate::domain::rating::Rating;
use crate::ports::{RatingRepository, StoreError};

/// In-memory storage for ratings.
#[derive(Debug, Default)]
pub struct InMemoryRatingRepository {
    ratings: RwLock<Vec<Rating>>,
}

impl InMemoryRatingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            ratings: RwLock::new(Vec::new()),
        }
    }

    /// Returns the total number of stored ratings (for test assertions).
    pub async fn rating_count(&self) -> usize {
        self.ratings.read().await.len()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn insert(&self, rating: &Rating) -> Result<(), StoreError> {
        self.ratings.write().await.push(rating.clone());
        Ok(())
    }

    async fn exists(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, StoreError> {
        let ratings = self.ratings.read().await;
        Ok(ratings.iter().any(|r| {
            r.seller_id() == seller_id && r.buyer_id() == buyer_id && r.listing_id() == listing_id
        }))
    }

    async fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Rating>, StoreError> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .iter()
            .filter(|r| r.seller_id() == seller_id)
            .cloned()
            .collect())
    }
}
