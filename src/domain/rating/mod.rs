//! Rating domain - one star rating per completed transaction.
//!
//! A buyer rates a seller once per listing transaction. The seller's
//! profile carries a denormalized score that is always the full
//! recomputation of every rating on record. Pending-rating records track
//! transactions that have not been rated yet so reminders can be sent.

mod pending;
mod rating;
mod seller_score;
mod stars;

pub use pending::{PendingRating, ReminderPolicy, MAX_REMINDERS, STALE_AFTER_DAYS};
pub use rating::{Rating, MAX_COMMENT_LENGTH};
pub use seller_score::{RatingStats, SellerScore};
pub use stars::{Stars, MAX_STARS, MIN_STARS};
