//! Rating services - the ledger and the reminder scheduler.

mod ledger;
mod reminders;

pub use ledger::{RatingLedger, SubmitRating, SubmitRatingError};
pub use reminders::{ReminderScheduler, SchedulePendingRating};
