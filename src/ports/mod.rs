//! Ports - Interfaces for the external document store.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the managed document store. Adapters implement these
//! ports; the application services depend only on the traits.
//!
//! ## Repository Ports
//!
//! - `RatingRepository` - rating rows and the triple-existence check
//! - `SellerProfileRepository` - the score fields on a user record
//! - `ConversationRepository` - conversations and their messages
//! - `PendingRatingRepository` - pending-rating reminder records

mod conversation_repository;
mod pending_rating_repository;
mod rating_repository;
mod seller_profile_repository;

pub use conversation_repository::ConversationRepository;
pub use pending_rating_repository::PendingRatingRepository;
pub use rating_repository::RatingRepository;
pub use seller_profile_repository::SellerProfileRepository;

use thiserror::Error;

/// Errors surfaced by the document store.
///
/// Retry and backoff policy is the store client's concern, not this
/// crate's: `Unavailable` is propagated to callers untouched.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed transiently.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl StoreError {
    /// Creates a not-found error for the given record kind and id.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
