//! Pending-rating records and the reminder schedule.
//!
//! When a transaction completes, a pending-rating record is written so
//! the buyer can be nudged to rate the seller. Reminders follow a fixed
//! schedule and stop after three sends; records older than thirty days
//! are swept regardless of state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, PendingRatingId, Timestamp, UserId};

/// Reminders stop after this many sends.
pub const MAX_REMINDERS: u32 = 3;

/// Pending records older than this are swept by cleanup.
pub const STALE_AFTER_DAYS: i64 = 30;

/// A completed transaction the buyer has not rated yet.
///
/// Carries denormalized display fields (listing title, names, buyer
/// email) so a reminder can be composed without extra lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRating {
    id: PendingRatingId,
    listing_id: ListingId,
    seller_id: UserId,
    buyer_id: UserId,
    listing_title: String,
    seller_name: String,
    buyer_email: String,
    buyer_name: String,
    created_at: Timestamp,
    last_reminded: Option<Timestamp>,
    reminders_sent: u32,
}

impl PendingRating {
    /// Creates a fresh pending rating with no reminders sent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        listing_id: ListingId,
        seller_id: UserId,
        buyer_id: UserId,
        listing_title: impl Into<String>,
        seller_name: impl Into<String>,
        buyer_email: impl Into<String>,
        buyer_name: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: PendingRatingId::new(),
            listing_id,
            seller_id,
            buyer_id,
            listing_title: listing_title.into(),
            seller_name: seller_name.into(),
            buyer_email: buyer_email.into(),
            buyer_name: buyer_name.into(),
            created_at,
            last_reminded: None,
            reminders_sent: 0,
        }
    }

    /// Reconstitutes a pending rating from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PendingRatingId,
        listing_id: ListingId,
        seller_id: UserId,
        buyer_id: UserId,
        listing_title: String,
        seller_name: String,
        buyer_email: String,
        buyer_name: String,
        created_at: Timestamp,
        last_reminded: Option<Timestamp>,
        reminders_sent: u32,
    ) -> Self {
        Self {
            id,
            listing_id,
            seller_id,
            buyer_id,
            listing_title,
            seller_name,
            buyer_email,
            buyer_name,
            created_at,
            last_reminded,
            reminders_sent,
        }
    }

    /// Records that a reminder went out at the given time.
    pub fn record_reminder(&mut self, at: Timestamp) {
        self.reminders_sent += 1;
        self.last_reminded = Some(at);
    }

    pub fn id(&self) -> &PendingRatingId {
        &self.id
    }

    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    pub fn buyer_id(&self) -> &UserId {
        &self.buyer_id
    }

    pub fn listing_title(&self) -> &str {
        &self.listing_title
    }

    pub fn seller_name(&self) -> &str {
        &self.seller_name
    }

    pub fn buyer_email(&self) -> &str {
        &self.buyer_email
    }

    pub fn buyer_name(&self) -> &str {
        &self.buyer_name
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_reminded(&self) -> Option<&Timestamp> {
        self.last_reminded.as_ref()
    }

    pub fn reminders_sent(&self) -> u32 {
        self.reminders_sent
    }
}

/// The reminder schedule:
///
/// - 1st reminder: 1 day after the transaction
/// - 2nd reminder: 3 days after the transaction, at least 48 hours
///   after the first reminder
/// - 3rd reminder: 7 days after the transaction, at least 72 hours
///   after the second reminder
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderPolicy;

impl ReminderPolicy {
    /// Returns true if the record is due its next reminder at `now`.
    pub fn is_due(&self, pending: &PendingRating, now: &Timestamp) -> bool {
        if pending.reminders_sent() >= MAX_REMINDERS {
            return false;
        }

        let days_since_transaction = now.duration_since(pending.created_at()).num_days();
        let hours_since_last = pending
            .last_reminded()
            .map(|last| now.duration_since(last).num_hours())
            .unwrap_or(i64::MAX);

        match pending.reminders_sent() {
            0 => days_since_transaction >= 1,
            1 => days_since_transaction >= 3 && hours_since_last >= 48,
            2 => days_since_transaction >= 7 && hours_since_last >= 72,
            _ => false,
        }
    }

    /// Returns true if the record is old enough to be swept.
    pub fn is_stale(&self, pending: &PendingRating, now: &Timestamp) -> bool {
        now.duration_since(pending.created_at()).num_days() >= STALE_AFTER_DAYS
    }
}
