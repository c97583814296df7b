//! Rating reminder scheduling.
//!
//! Tracks completed transactions the buyer has not rated yet and
//! decides when the next nudge is due. Actually delivering a reminder
//! (email) belongs to the surrounding application; this service only
//! answers "which records are due now" and records sends.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{ListingId, PendingRatingId, Timestamp, UserId};
use crate::domain::rating::{PendingRating, ReminderPolicy, MAX_REMINDERS, STALE_AFTER_DAYS};
use crate::ports::{PendingRatingRepository, StoreError};

/// Command to record a completed transaction awaiting a rating.
#[derive(Debug, Clone)]
pub struct SchedulePendingRating {
    pub listing_id: ListingId,
    pub seller_id: UserId,
    pub buyer_id: UserId,
    /// Denormalized display fields, captured so a reminder can be
    /// composed without further lookups.
    pub listing_title: String,
    pub seller_name: String,
    pub buyer_email: String,
    pub buyer_name: String,
}

/// Service deciding reminder due-ness over pending-rating records.
pub struct ReminderScheduler<G>
where
    G: PendingRatingRepository,
{
    pending: Arc<G>,
    policy: ReminderPolicy,
}

impl<G> ReminderScheduler<G>
where
    G: PendingRatingRepository,
{
    /// Creates a scheduler over the given repository.
    pub fn new(pending: Arc<G>) -> Self {
        Self {
            pending,
            policy: ReminderPolicy,
        }
    }

    /// Records that a transaction completed and should be rated.
    pub async fn schedule(
        &self,
        cmd: SchedulePendingRating,
    ) -> Result<PendingRatingId, StoreError> {
        let pending = PendingRating::new(
            cmd.listing_id,
            cmd.seller_id,
            cmd.buyer_id,
            cmd.listing_title,
            cmd.seller_name,
            cmd.buyer_email,
            cmd.buyer_name,
            Timestamp::now(),
        );
        self.pending.insert(&pending).await?;
        debug!(pending = %pending.id(), "scheduled rating reminder");
        Ok(*pending.id())
    }

    /// Returns every record due a reminder at `now`.
    pub async fn due_reminders(&self, now: Timestamp) -> Result<Vec<PendingRating>, StoreError> {
        let candidates = self.pending.list_awaiting_reminder(MAX_REMINDERS).await?;
        Ok(candidates
            .into_iter()
            .filter(|p| self.policy.is_due(p, &now))
            .collect())
    }

    /// Records that a reminder went out for the record.
    pub async fn record_reminder_sent(&self, id: &PendingRatingId) -> Result<(), StoreError> {
        self.pending.record_reminder(id, Timestamp::now()).await
    }

    /// Lists the buyer's transactions still awaiting a rating.
    pub async fn pending_for_buyer(
        &self,
        buyer_id: &UserId,
    ) -> Result<Vec<PendingRating>, StoreError> {
        self.pending.list_by_buyer(buyer_id).await
    }

    /// Sweeps records older than the staleness window. Returns the
    /// count removed.
    pub async fn cleanup_stale(&self, now: Timestamp) -> Result<usize, StoreError> {
        let removed = self
            .pending
            .delete_created_before(now.minus_days(STALE_AFTER_DAYS))
            .await?;
        if removed > 0 {
            debug!(removed, "swept stale pending ratings");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPendingRatingRepository;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn scheduler() -> (
        ReminderScheduler<InMemoryPendingRatingRepository>,
        Arc<InMemoryPendingRatingRepository>,
    ) {
        let repo = Arc::new(InMemoryPendingRatingRepository::new());
        (ReminderScheduler::new(Arc::clone(&repo)), repo)
    }

    fn schedule_cmd(buyer: &str) -> SchedulePendingRating {
        SchedulePendingRating {
            listing_id: ListingId::new(),
            seller_id: user("seller"),
            buyer_id: user(buyer),
            listing_title: "Ti-84 calculator".to_string(),
            seller_name: "Sam Seller".to_string(),
            buyer_email: format!("{buyer}@berkeley.edu"),
            buyer_name: "Bea Buyer".to_string(),
        }
    }

    #[tokio::test]
    async fn schedule_stores_a_fresh_record() {
        let (scheduler, repo) = scheduler();

        scheduler.schedule(schedule_cmd("buyer")).await.unwrap();

        let listed = repo.list_by_buyer(&user("buyer")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].reminders_sent(), 0);
    }

    #[tokio::test]
    async fn freshly_scheduled_record_is_not_due() {
        let (scheduler, _repo) = scheduler();
        scheduler.schedule(schedule_cmd("buyer")).await.unwrap();

        let due = scheduler.due_reminders(Timestamp::now()).await.unwrap();

        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn day_old_record_is_due_its_first_reminder() {
        let (scheduler, _repo) = scheduler();
        scheduler.schedule(schedule_cmd("buyer")).await.unwrap();

        let due = scheduler
            .due_reminders(Timestamp::now().plus_days(1))
            .await
            .unwrap();

        assert_eq!(due.len(), 1);
    }

    #[tokio::test]
    async fn recording_a_send_defers_the_next_reminder() {
        let (scheduler, _repo) = scheduler();
        let id = scheduler.schedule(schedule_cmd("buyer")).await.unwrap();

        scheduler.record_reminder_sent(&id).await.unwrap();

        // Day 1 no longer qualifies: the second reminder needs day 3
        // plus 48 hours of spacing.
        let due = scheduler
            .due_reminders(Timestamp::now().plus_days(1))
            .await
            .unwrap();
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn exhausted_records_are_never_due() {
        let (scheduler, _repo) = scheduler();
        let id = scheduler.schedule(schedule_cmd("buyer")).await.unwrap();
        for _ in 0..3 {
            scheduler.record_reminder_sent(&id).await.unwrap();
        }

        let due = scheduler
            .due_reminders(Timestamp::now().plus_days(60))
            .await
            .unwrap();

        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn cleanup_sweeps_only_stale_records() {
        let (scheduler, repo) = scheduler();
        scheduler.schedule(schedule_cmd("fresh")).await.unwrap();
        scheduler.schedule(schedule_cmd("old")).await.unwrap();

        // Both records were created "now"; sweep as seen from 31 days on
        // removes both, while a sweep from now removes neither.
        let removed_now = scheduler.cleanup_stale(Timestamp::now()).await.unwrap();
        assert_eq!(removed_now, 0);

        let removed_later = scheduler
            .cleanup_stale(Timestamp::now().plus_days(31))
            .await
            .unwrap();
        assert_eq!(removed_later, 2);
        assert_eq!(repo.record_count().await, 0);
    }

    #[tokio::test]
    async fn pending_for_buyer_lists_only_their_records() {
        let (scheduler, _repo) = scheduler();
        scheduler.schedule(schedule_cmd("b1")).await.unwrap();
        scheduler.schedule(schedule_cmd("b2")).await.unwrap();

        let listed = scheduler.pending_for_buyer(&user("b1")).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].buyer_id(), &user("b1"));
    }
}
