//! Chat services - the conversation store and its live feed.

mod feed;
mod store;

pub use feed::Subscription;
pub use store::{ConversationStore, SendMessageError};
