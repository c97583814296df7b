//! Seller profile repository port.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::rating::SellerScore;

use super::StoreError;

/// Repository port for the denormalized score fields on a user record.
///
/// Only the `rating`/`ratingCount` pair is touched here; the rest of the
/// user record belongs to the surrounding application.
#[async_trait]
pub trait SellerProfileRepository: Send + Sync {
    /// Persists a freshly recomputed score onto the seller's record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user record exists for the seller
    async fn update_score(&self, seller_id: &UserId, score: SellerScore)
        -> Result<(), StoreError>;

    /// Reads the currently persisted score for a seller.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user record exists for the seller
    async fn score(&self, seller_id: &UserId) -> Result<SellerScore, StoreError>;
}
