//! In-memory seller profile repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::rating::SellerScore;
use crate::ports::{SellerProfileRepository, StoreError};

/// In-memory storage for the score fields on user records.
///
/// Mirrors the store's semantics: updating the score of a user that was
/// never registered fails with `NotFound`, the same way a partial
/// update against a missing document does.
#[derive(Debug, Default)]
pub struct InMemorySellerProfileRepository {
    scores: RwLock<HashMap<UserId, SellerScore>>,
}

impl InMemorySellerProfileRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            scores: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a repository pre-seeded with unrated user records.
    pub fn with_users<I>(user_ids: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        let scores = user_ids
            .into_iter()
            .map(|id| (id, SellerScore::default()))
            .collect();
        Self {
            scores: RwLock::new(scores),
        }
    }

    /// Registers a user record with an unrated score.
    pub async fn register(&self, user_id: UserId) {
        self.scores
            .write()
            .await
            .insert(user_id, SellerScore::default());
    }
}

#[async_trait]
impl SellerProfileRepository for InMemorySellerProfileRepository {
    async fn update_score(
        &self,
        seller_id: &UserId,
        score: SellerScore,
    ) -> Result<(), StoreError> {
        let mut scores = self.scores.write().await;
        match scores.get_mut(seller_id) {
            Some(existing) => {
                *existing = score;
                Ok(())
            }
            None => Err(StoreError::not_found("user", seller_id)),
        }
    }

    async fn score(&self, seller_id: &UserId) -> Result<SellerScore, StoreError> {
        self.scores
            .read()
            .await
            .get(seller_id)
            .copied()
            .ok_or_else(|| StoreError::not_found("user", seller_id))
    }
}
