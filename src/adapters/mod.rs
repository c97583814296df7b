//! Adapters - implementations of the store ports.
//!
//! - `memory` - in-process implementations for tests and development
//! - `postgres` - production implementations on PostgreSQL via sqlx

pub mod memory;
pub mod postgres;
