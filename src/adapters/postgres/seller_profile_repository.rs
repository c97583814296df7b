//! PostgreSQL implementation of SellerProfileRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::UserId;
use crate::domain::rating::SellerScore;
use crate::ports::{SellerProfileRepository, StoreError};

/// PostgreSQL implementation of SellerProfileRepository.
///
/// Touches only the `rating`/`rating_count` columns of the user record;
/// the rest of the row belongs to the surrounding application.
#[derive(Clone)]
pub struct PostgresSellerProfileRepository {
    pool: PgPool,
}

impl PostgresSellerProfileRepository {
    /// Creates a new PostgresSellerProfileRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SellerProfileRepository for PostgresSellerProfileRepository {
    async fn update_score(
        &self,
        seller_id: &UserId,
        score: SellerScore,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET rating = $2, rating_count = $3
            WHERE id = $1
            "#,
        )
        .bind(seller_id.as_str())
        .bind(score.rating())
        .bind(score.rating_count() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to update seller score: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", seller_id));
        }

        Ok(())
    }

    async fn score(&self, seller_id: &UserId) -> Result<SellerScore, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT rating, rating_count FROM users WHERE id = $1
            "#,
        )
        .bind(seller_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to fetch seller score: {}", e)))?
        .ok_or_else(|| StoreError::not_found("user", seller_id))?;

        let rating: f64 = row.get("rating");
        let rating_count: i32 = row.get("rating_count");
        Ok(SellerScore::from_parts(rating, rating_count as u32))
    }
}
