//! PostgreSQL implementation of PendingRatingRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{ListingId, PendingRatingId, Timestamp, UserId};
use crate::domain::rating::PendingRating;
use crate::ports::{PendingRatingRepository, StoreError};

/// PostgreSQL implementation of PendingRatingRepository.
#[derive(Clone)]
pub struct PostgresPendingRatingRepository {
    pool: PgPool,
}

impl PostgresPendingRatingRepository {
    /// Creates a new PostgresPendingRatingRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingRatingRepository for PostgresPendingRatingRepository {
    async fn insert(&self, pending: &PendingRating) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pending_ratings (
                id, listing_id, seller_id, buyer_id, listing_title,
                seller_name, buyer_email, buyer_name, created_at,
                last_reminded, reminders_sent
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(pending.id().as_uuid())
        .bind(pending.listing_id().as_uuid())
        .bind(pending.seller_id().as_str())
        .bind(pending.buyer_id().as_str())
        .bind(pending.listing_title())
        .bind(pending.seller_name())
        .bind(pending.buyer_email())
        .bind(pending.buyer_name())
        .bind(pending.created_at().as_datetime())
        .bind(pending.last_reminded().map(|t| *t.as_datetime()))
        .bind(pending.reminders_sent() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to insert pending rating: {}", e)))?;

        Ok(())
    }

    async fn list_awaiting_reminder(
        &self,
        max_sent: u32,
    ) -> Result<Vec<PendingRating>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, listing_id, seller_id, buyer_id, listing_title,
                   seller_name, buyer_email, buyer_name, created_at,
                   last_reminded, reminders_sent
            FROM pending_ratings
            WHERE reminders_sent < $1
            "#,
        )
        .bind(max_sent as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to list pending ratings: {}", e)))?;

        rows.iter().map(row_to_pending).collect()
    }

    async fn list_by_buyer(&self, buyer_id: &UserId) -> Result<Vec<PendingRating>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, listing_id, seller_id, buyer_id, listing_title,
                   seller_name, buyer_email, buyer_name, created_at,
                   last_reminded, reminders_sent
            FROM pending_ratings
            WHERE buyer_id = $1
            "#,
        )
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            StoreError::Unavailable(format!("Failed to list buyer pending ratings: {}", e))
        })?;

        rows.iter().map(row_to_pending).collect()
    }

    async fn record_reminder(
        &self,
        id: &PendingRatingId,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE pending_ratings
            SET reminders_sent = reminders_sent + 1, last_reminded = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to record reminder: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("pending rating", id));
        }

        Ok(())
    }

    async fn delete_for_transaction(
        &self,
        seller_id: &UserId,
        buyer_id: &UserId,
        listing_id: &ListingId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM pending_ratings
            WHERE seller_id = $1 AND buyer_id = $2 AND listing_id = $3
            "#,
        )
        .bind(seller_id.as_str())
        .bind(buyer_id.as_str())
        .bind(listing_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to delete pending rating: {}", e)))?;

        Ok(())
    }

    async fn delete_created_before(&self, cutoff: Timestamp) -> Result<usize, StoreError> {
        let result = sqlx::query("DELETE FROM pending_ratings WHERE created_at < $1")
            .bind(cutoff.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to sweep pending ratings: {}", e))
            })?;

        Ok(result.rows_affected() as usize)
    }
}

fn row_to_pending(row: &sqlx::postgres::PgRow) -> Result<PendingRating, StoreError> {
    let id: uuid::Uuid = row.get("id");
    let listing_id: uuid::Uuid = row.get("listing_id");
    let seller_id: String = row.get("seller_id");
    let buyer_id: String = row.get("buyer_id");
    let listing_title: String = row.get("listing_title");
    let seller_name: String = row.get("seller_name");
    let buyer_email: String = row.get("buyer_email");
    let buyer_name: String = row.get("buyer_name");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let last_reminded: Option<chrono::DateTime<chrono::Utc>> = row.get("last_reminded");
    let reminders_sent: i32 = row.get("reminders_sent");

    let seller_id = UserId::new(seller_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt seller_id column: {}", e)))?;
    let buyer_id = UserId::new(buyer_id)
        .map_err(|e| StoreError::Unavailable(format!("Corrupt buyer_id column: {}", e)))?;

    Ok(PendingRating::reconstitute(
        PendingRatingId::from_uuid(id),
        ListingId::from_uuid(listing_id),
        seller_id,
        buyer_id,
        listing_title,
        seller_name,
        buyer_email,
        buyer_name,
        Timestamp::from_datetime(created_at),
        last_reminded.map(Timestamp::from_datetime),
        reminders_sent as u32,
    ))
}
