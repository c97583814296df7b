//! PostgreSQL adapters.
//!
//! Production implementations of the store ports on `sqlx::PgPool`.
//! Schema lives under `migrations/`.

mod conversation_repository;
mod pending_rating_repository;
mod rating_repository;
mod seller_profile_repository;

pub use conversation_repository::PostgresConversationRepository;
pub use pending_rating_repository::PostgresPendingRatingRepository;
pub use rating_repository::PostgresRatingRepository;
pub use seller_profile_repository::PostgresSellerProfileRepository;
