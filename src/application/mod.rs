//! Application layer - services that orchestrate the ports.
//!
//! Services are generic over the repository ports and carry no domain
//! state of their own. Each operation has its own error enum so callers
//! can branch on business-rule violations without string matching.

pub mod chat;
pub mod rating;
