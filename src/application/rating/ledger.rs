//! Rating ledger - one rating per transaction, aggregate kept consistent.
//!
//! The ledger accepts a buyer's rating of a seller for one listing
//! transaction, enforces the one-rating-per-triple rule with an
//! existence check, and keeps the seller's denormalized score equal to
//! the full recomputation of every rating on record.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::foundation::{ListingId, RatingId, Timestamp, UserId, ValidationError};
use crate::domain::rating::{Rating, RatingStats, SellerScore, Stars};
use crate::ports::{PendingRatingRepository, RatingRepository, SellerProfileRepository, StoreError};

/// Command to submit a rating for a completed transaction.
#[derive(Debug, Clone)]
pub struct SubmitRating {
    /// The rated party.
    pub seller_id: UserId,
    /// The rater.
    pub buyer_id: UserId,
    /// The transaction context.
    pub listing_id: ListingId,
    /// Whole stars, 1 to 5.
    pub stars: Stars,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

/// Errors that can occur when submitting a rating.
#[derive(Debug, Error)]
pub enum SubmitRatingError {
    /// Sellers cannot rate their own transactions.
    #[error("A seller cannot rate their own transaction")]
    SelfRating,

    /// A rating already exists for this (seller, buyer, listing) triple.
    ///
    /// A business-rule violation, not a transient condition; callers
    /// must not retry.
    #[error("This transaction has already been rated")]
    DuplicateRating,

    /// The comment failed validation.
    #[error(transparent)]
    InvalidComment(#[from] ValidationError),

    /// The store rejected or could not perform an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service enforcing the rating rules and score recomputation.
pub struct RatingLedger<R, P, G>
where
    R: RatingRepository,
    P: SellerProfileRepository,
    G: PendingRatingRepository,
{
    ratings: Arc<R>,
    profiles: Arc<P>,
    pending: Arc<G>,
}

impl<R, P, G> RatingLedger<R, P, G>
where
    R: RatingRepository,
    P: SellerProfileRepository,
    G: PendingRatingRepository,
{
    /// Creates a ledger over the given repositories.
    pub fn new(ratings: Arc<R>, profiles: Arc<P>, pending: Arc<G>) -> Self {
        Self {
            ratings,
            profiles,
            pending,
        }
    }

    /// Submits a rating and recomputes the seller's score.
    ///
    /// The duplicate check and the insert are two store calls, not one
    /// atomic operation; the recomputation step keeps the score correct
    /// even when two buyers submit near-simultaneously.
    pub async fn submit_rating(&self, cmd: SubmitRating) -> Result<RatingId, SubmitRatingError> {
        if cmd.seller_id == cmd.buyer_id {
            return Err(SubmitRatingError::SelfRating);
        }

        if self
            .ratings
            .exists(&cmd.seller_id, &cmd.buyer_id, &cmd.listing_id)
            .await?
        {
            return Err(SubmitRatingError::DuplicateRating);
        }

        let rating = Rating::new(
            cmd.seller_id.clone(),
            cmd.buyer_id.clone(),
            cmd.listing_id,
            cmd.stars,
            cmd.comment,
            Timestamp::now(),
        )?;
        let rating_id = *rating.id();

        self.ratings.insert(&rating).await?;
        let score = self.recompute_seller_score(&cmd.seller_id).await?;
        debug!(
            seller = %cmd.seller_id,
            rating = score.rating(),
            count = score.rating_count(),
            "seller score recomputed"
        );

        // The transaction is rated now; its reminder record can go.
        // Best-effort: a failed cleanup only means a redundant reminder.
        if let Err(err) = self
            .pending
            .delete_for_transaction(&cmd.seller_id, &cmd.buyer_id, &cmd.listing_id)
            .await
        {
            warn!(seller = %cmd.seller_id, "failed to clear pending rating: {err}");
        }

        Ok(rating_id)
    }

    /// Recomputes the seller's score from every rating on record and
    /// persists it.
    ///
    /// Always a full recomputation, never an incremental update, so
    /// interleaved recomputations each write a value reflecting a
    /// consistent snapshot of the rating set. Idempotent.
    pub async fn recompute_seller_score(
        &self,
        seller_id: &UserId,
    ) -> Result<SellerScore, StoreError> {
        let ratings = self.ratings.list_by_seller(seller_id).await?;
        let stars: Vec<Stars> = ratings.iter().map(|r| r.stars()).collect();
        let score = SellerScore::compute(&stars);
        self.profiles.update_score(seller_id, score).await?;
        Ok(score)
    }

    /// Returns true if the buyer has not yet rated this transaction.
    pub async fn can_rate(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, StoreError> {
        Ok(!self.ratings.exists(seller_id, buyer_id, listing_id).await?)
    }

    /// Returns every rating recorded for the seller.
    pub async fn seller_ratings(&self, seller_id: &UserId) -> Result<Vec<Rating>, StoreError> {
        self.ratings.list_by_seller(seller_id).await
    }

    /// Returns the seller's per-star breakdown for profile display.
    pub async fn rating_stats(&self, seller_id: &UserId) -> Result<RatingStats, StoreError> {
        let ratings = self.ratings.list_by_seller(seller_id).await?;
        let stars: Vec<Stars> = ratings.iter().map(|r| r.stars()).collect();
        Ok(RatingStats::compute(&stars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPendingRatingRepository, InMemoryRatingRepository, InMemorySellerProfileRepository,
    };
    use crate::domain::rating::{PendingRating, MAX_COMMENT_LENGTH};
    use async_trait::async_trait;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn ledger() -> RatingLedger<
        InMemoryRatingRepository,
        InMemorySellerProfileRepository,
        InMemoryPendingRatingRepository,
    > {
        RatingLedger::new(
            Arc::new(InMemoryRatingRepository::new()),
            Arc::new(InMemorySellerProfileRepository::with_users([
                user("seller"),
                user("unrated"),
            ])),
            Arc::new(InMemoryPendingRatingRepository::new()),
        )
    }

    fn submit(seller: &str, buyer: &str, listing: ListingId, stars: u8) -> SubmitRating {
        SubmitRating {
            seller_id: user(seller),
            buyer_id: user(buyer),
            listing_id: listing,
            stars: Stars::new(stars).unwrap(),
            comment: None,
        }
    }

    mod submit_rating {
        use super::*;

        #[tokio::test]
        async fn first_rating_is_accepted_and_scored() {
            let ledger = ledger();

            ledger
                .submit_rating(submit("seller", "buyer", ListingId::new(), 5))
                .await
                .unwrap();

            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating(), 5.0);
            assert_eq!(score.rating_count(), 1);
        }

        #[tokio::test]
        async fn duplicate_rating_is_rejected_and_score_untouched() {
            // Given: a rated transaction
            let ledger = ledger();
            let listing = ListingId::new();
            ledger
                .submit_rating(submit("seller", "buyer", listing, 4))
                .await
                .unwrap();

            // When: the buyer rates the same transaction again
            let result = ledger
                .submit_rating(submit("seller", "buyer", listing, 1))
                .await;

            // Then: rejected, and the score reflects only the first rating
            assert!(matches!(result, Err(SubmitRatingError::DuplicateRating)));
            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating(), 4.0);
            assert_eq!(score.rating_count(), 1);
        }

        #[tokio::test]
        async fn self_rating_is_rejected() {
            let ledger = ledger();

            let result = ledger
                .submit_rating(submit("alice", "alice", ListingId::new(), 5))
                .await;

            assert!(matches!(result, Err(SubmitRatingError::SelfRating)));
        }

        #[tokio::test]
        async fn same_buyer_can_rate_seller_on_a_different_listing() {
            let ledger = ledger();

            ledger
                .submit_rating(submit("seller", "buyer", ListingId::new(), 5))
                .await
                .unwrap();
            ledger
                .submit_rating(submit("seller", "buyer", ListingId::new(), 3))
                .await
                .unwrap();

            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating_count(), 2);
        }

        #[tokio::test]
        async fn oversized_comment_is_rejected_before_any_write() {
            let ledger = ledger();
            let mut cmd = submit("seller", "buyer", ListingId::new(), 5);
            cmd.comment = Some("x".repeat(MAX_COMMENT_LENGTH + 1));

            let result = ledger.submit_rating(cmd).await;

            assert!(matches!(result, Err(SubmitRatingError::InvalidComment(_))));
            assert!(ledger
                .can_rate(&user("seller"), &user("buyer"), &ListingId::new())
                .await
                .unwrap());
            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating_count(), 0);
        }

        #[tokio::test]
        async fn aggregate_follows_the_example_scenario() {
            // 5, 3, 4 from three buyers -> 4.0 / 3; then 2 -> 3.5 / 4
            let ledger = ledger();
            for (buyer, stars) in [("b1", 5), ("b2", 3), ("b3", 4)] {
                ledger
                    .submit_rating(submit("seller", buyer, ListingId::new(), stars))
                    .await
                    .unwrap();
            }

            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating(), 4.0);
            assert_eq!(score.rating_count(), 3);

            ledger
                .submit_rating(submit("seller", "b4", ListingId::new(), 2))
                .await
                .unwrap();

            let score = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            assert_eq!(score.rating(), 3.5);
            assert_eq!(score.rating_count(), 4);
        }

        #[tokio::test]
        async fn clears_pending_rating_for_the_transaction() {
            let pending_repo = Arc::new(InMemoryPendingRatingRepository::new());
            let ledger = RatingLedger::new(
                Arc::new(InMemoryRatingRepository::new()),
                Arc::new(InMemorySellerProfileRepository::with_users([user("seller")])),
                Arc::clone(&pending_repo),
            );

            let listing = ListingId::new();
            pending_repo
                .insert(&PendingRating::new(
                    listing,
                    user("seller"),
                    user("buyer"),
                    "Bike",
                    "Sam Seller",
                    "buyer@berkeley.edu",
                    "Bea Buyer",
                    Timestamp::now(),
                ))
                .await
                .unwrap();

            ledger
                .submit_rating(submit("seller", "buyer", listing, 5))
                .await
                .unwrap();

            let remaining = pending_repo.list_by_buyer(&user("buyer")).await.unwrap();
            assert!(remaining.is_empty());
        }

        #[tokio::test]
        async fn pending_cleanup_failure_does_not_fail_the_submit() {
            struct FailingPendingRepo;

            #[async_trait]
            impl PendingRatingRepository for FailingPendingRepo {
                async fn insert(&self, _: &PendingRating) -> Result<(), StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
                async fn list_awaiting_reminder(
                    &self,
                    _: u32,
                ) -> Result<Vec<PendingRating>, StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
                async fn list_by_buyer(
                    &self,
                    _: &UserId,
                ) -> Result<Vec<PendingRating>, StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
                async fn record_reminder(
                    &self,
                    _: &crate::domain::foundation::PendingRatingId,
                    _: Timestamp,
                ) -> Result<(), StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
                async fn delete_for_transaction(
                    &self,
                    _: &UserId,
                    _: &UserId,
                    _: &ListingId,
                ) -> Result<(), StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
                async fn delete_created_before(&self, _: Timestamp) -> Result<usize, StoreError> {
                    Err(StoreError::Unavailable("down".into()))
                }
            }

            let ledger = RatingLedger::new(
                Arc::new(InMemoryRatingRepository::new()),
                Arc::new(InMemorySellerProfileRepository::with_users([user("seller")])),
                Arc::new(FailingPendingRepo),
            );

            let result = ledger
                .submit_rating(submit("seller", "buyer", ListingId::new(), 5))
                .await;

            assert!(result.is_ok());
        }
    }

    mod can_rate {
        use super::*;

        #[tokio::test]
        async fn true_before_and_false_after_submitting() {
            let ledger = ledger();
            let listing = ListingId::new();

            assert!(ledger
                .can_rate(&user("seller"), &user("buyer"), &listing)
                .await
                .unwrap());

            ledger
                .submit_rating(submit("seller", "buyer", listing, 5))
                .await
                .unwrap();

            assert!(!ledger
                .can_rate(&user("seller"), &user("buyer"), &listing)
                .await
                .unwrap());
        }
    }

    mod recompute {
        use super::*;

        #[tokio::test]
        async fn is_idempotent_with_no_new_ratings() {
            let ledger = ledger();
            ledger
                .submit_rating(submit("seller", "b1", ListingId::new(), 5))
                .await
                .unwrap();
            ledger
                .submit_rating(submit("seller", "b2", ListingId::new(), 2))
                .await
                .unwrap();

            let first = ledger.recompute_seller_score(&user("seller")).await.unwrap();
            let second = ledger.recompute_seller_score(&user("seller")).await.unwrap();

            assert_eq!(first, second);
        }

        #[tokio::test]
        async fn zero_ratings_yield_zero_score() {
            let ledger = ledger();

            let score = ledger
                .recompute_seller_score(&user("unrated"))
                .await
                .unwrap();

            assert_eq!(score.rating(), 0.0);
            assert_eq!(score.rating_count(), 0);
        }
    }

    mod stats {
        use super::*;

        #[tokio::test]
        async fn breakdown_counts_by_star_value() {
            let ledger = ledger();
            for (buyer, stars) in [("b1", 5), ("b2", 5), ("b3", 2)] {
                ledger
                    .submit_rating(submit("seller", buyer, ListingId::new(), stars))
                    .await
                    .unwrap();
            }

            let stats = ledger.rating_stats(&user("seller")).await.unwrap();

            assert_eq!(stats.total, 3);
            assert_eq!(stats.average, 4.0);
            assert_eq!(stats.breakdown, [0, 1, 0, 0, 2]);
        }

        #[tokio::test]
        async fn seller_ratings_returns_every_rating() {
            let ledger = ledger();
            for (buyer, stars) in [("b1", 5), ("b2", 3)] {
                ledger
                    .submit_rating(submit("seller", buyer, ListingId::new(), stars))
                    .await
                    .unwrap();
            }

            let ratings = ledger.seller_ratings(&user("seller")).await.unwrap();
            assert_eq!(ratings.len(), 2);
        }
    }
}
