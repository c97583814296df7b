//! In-memory adapters.
//!
//! Store the same shapes the postgres adapters persist, behind
//! `tokio::sync::RwLock`. Useful for tests and local development; not
//! intended for production use.

mod conversation_repository;
mod pending_rating_repository;
mod rating_repository;
mod seller_profile_repository;

pub use conversation_repository::InMemoryConversationRepository;
pub use pending_rating_repository::InMemoryPendingRatingRepository;
pub use rating_repository::InMemoryRatingRepository;
pub use seller_profile_repository::InMemorySellerProfileRepository;
