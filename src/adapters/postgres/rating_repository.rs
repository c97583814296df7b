//! PostgreSQL implementation of RatingRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ListingId, RatingId, Timestamp, UserId};
use crate::domain::rating::{Rating, Stars};
use crate::ports::{RatingRepository, StoreError};

/// PostgreSQL implementation of RatingRepository.
#[derive(Clone)]
pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    /// Creates a new PostgresRatingRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn insert(&self, rating: &Rating) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ratings (id, seller_id, buyer_id, listing_id, stars, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(rating.id().as_uuid())
        .bind(rating.seller_id().as_str())
        .bind(rating.buyer_id().as_str())
        .bind(rating.listing_id().as_uuid())
        .bind(rating.stars().value() as i16)
        .bind(rating.comment())
        .bind(rating.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to insert rating: {}", e)))?;

        Ok(())
    }

    async fn exists(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM ratings
                WHERE seller_id = $1 AND buyer_id = $2 AND listing_id = $3
            ) AS found
            "#,
        )
        .bind(seller_id.as_str())
        .bind(buyer_id.as_str())
        .bind(listing_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to check rating existence: {}", e)))?;

        Ok(row.get("found"))
    }

    async fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Rating>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, seller_id, buyer_id, listing_id, stars, comment, created_at
            FROM ratings
            WHERE seller_id = $1
            "#,
        )
        .bind(seller_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to list seller ratings: {}", e)))?;

        rows.iter().map(row_to_rating).collect()
    }
}

fn row_to_rating(row: &sqlx::postgres::PgRow) -> Result<Rating, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let seller_id: String = row.get("seller_id");
    let buyer_id: String = row.get("buyer_id");
    let listing_id: uuid::Uuid = row.get("listing_id");
    let stars: i16 = row.get("stars");
    let comment: Option<String> = row.get("comment");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let seller_id = UserId::new(seller_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt seller_id column: {}", e)))?;
    let buyer_id = UserId::new(buyer_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt buyer_id column: {}", e)))?;
    let stars = Stars::new(stars as u8)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt stars column: {}", e)))?;

    Ok(Rating::reconstitute(
        RatingId::from_uuid(id),
        seller_id,
        buyer_id,
        ListingId::from_uuid(listing_id),
        stars,
        comment,
        Timestamp::from_datetime(created_at),
    ))
}
