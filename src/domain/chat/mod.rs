//! Chat domain - two-party conversations scoped to a listing.
//!
//! A conversation holds exactly two members (the seller and the buyer)
//! and owns its messages. The conversation record carries a denormalized
//! copy of the latest message so inbox views need not touch the message
//! subcollection.

mod conversation;
mod message;

pub use conversation::Conversation;
pub use message::{Message, MAX_MESSAGE_LENGTH};

/// How many of the most recent messages a live subscription materializes.
pub const RECENT_MESSAGE_WINDOW: usize = 100;
