//! Integration tests for the chat flow.
//!
//! Exercises the full path over the in-memory adapter:
//! 1. A buyer opens a conversation about a listing
//! 2. Messages append in order and mirror into the summary
//! 3. Subscribers receive full ordered snapshots
//! 4. Opening the thread marks the counterpart's messages read

use std::sync::Arc;
use std::time::Duration;

use campus_market::adapters::memory::InMemoryConversationRepository;
use campus_market::application::chat::ConversationStore;
use campus_market::domain::foundation::{ListingId, UserId};
use campus_market::ports::ConversationRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn store() -> (
    ConversationStore<InMemoryConversationRepository>,
    Arc<InMemoryConversationRepository>,
) {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init()
        .ok();

    let repo = Arc::new(InMemoryConversationRepository::new());
    (
        ConversationStore::with_feed_capacity(Arc::clone(&repo), 128),
        repo,
    )
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

// =============================================================================
// Conversation lifecycle and ordering
// =============================================================================

#[tokio::test]
async fn first_contact_creates_one_thread_and_orders_messages() {
    let (store, repo) = store();
    let listing = ListingId::new();

    // The buyer opens the thread twice; only one conversation exists.
    let conversation_id = store
        .open_conversation(listing, user("seller"), user("buyer"))
        .await
        .unwrap();
    let again = store
        .open_conversation(listing, user("seller"), user("buyer"))
        .await
        .unwrap();
    assert_eq!(conversation_id, again);
    assert_eq!(repo.conversation_count().await, 1);

    store
        .send_message(&conversation_id, &user("buyer"), "hello")
        .await
        .unwrap();
    store
        .send_message(&conversation_id, &user("buyer"), "are you around?")
        .await
        .unwrap();

    // The summary mirrors the latest message.
    let conversation = repo.find_by_id(&conversation_id).await.unwrap().unwrap();
    assert_eq!(conversation.last_message(), "are you around?");

    // A subscriber sees both messages in send order.
    let mut sub = store.subscribe_to_messages(&conversation_id).await.unwrap();
    let snapshot = sub.recv().await.unwrap();
    let bodies: Vec<&str> = snapshot.iter().map(|m| m.body()).collect();
    assert_eq!(bodies, ["hello", "are you around?"]);
}

#[tokio::test]
async fn snapshots_arrive_in_non_decreasing_creation_order() {
    let (store, _repo) = store();
    let conversation_id = store
        .open_conversation(ListingId::new(), user("seller"), user("buyer"))
        .await
        .unwrap();

    let mut sub = store.subscribe_to_messages(&conversation_id).await.unwrap();
    assert!(sub.recv().await.unwrap().is_empty());

    for body in ["one", "two", "three"] {
        store
            .send_message(&conversation_id, &user("buyer"), body)
            .await
            .unwrap();
        let snapshot = sub.recv().await.unwrap();
        let mut sorted = snapshot.clone();
        sorted.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        assert_eq!(snapshot, sorted);
        assert_eq!(snapshot.last().unwrap().body(), body);
    }
}

#[tokio::test]
async fn a_quiet_subscription_stays_quiet() {
    let (store, _repo) = store();
    let conversation_id = store
        .open_conversation(ListingId::new(), user("seller"), user("buyer"))
        .await
        .unwrap();

    let mut sub = store.subscribe_to_messages(&conversation_id).await.unwrap();
    sub.recv().await.unwrap();

    // No further change, no further delivery.
    let outcome = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
    assert!(outcome.is_err());
}

// =============================================================================
// Inbox
// =============================================================================

#[tokio::test]
async fn inbox_lists_threads_newest_first() {
    let (store, _repo) = store();

    let first = store
        .open_conversation(ListingId::new(), user("seller"), user("buyer"))
        .await
        .unwrap();
    let second = store
        .open_conversation(ListingId::new(), user("other-seller"), user("buyer"))
        .await
        .unwrap();

    store
        .send_message(&first, &user("buyer"), "still available?")
        .await
        .unwrap();
    store
        .send_message(&second, &user("buyer"), "can you do $20?")
        .await
        .unwrap();

    let mut inbox = store.subscribe_to_inbox(&user("buyer")).await.unwrap();
    let snapshot = inbox.recv().await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id(), &second);
    assert_eq!(snapshot[1].id(), &first);
}

#[tokio::test]
async fn both_members_see_the_thread_in_their_inbox() {
    let (store, _repo) = store();
    let conversation_id = store
        .open_conversation(ListingId::new(), user("seller"), user("buyer"))
        .await
        .unwrap();

    let mut seller_inbox = store.subscribe_to_inbox(&user("seller")).await.unwrap();
    let mut buyer_inbox = store.subscribe_to_inbox(&user("buyer")).await.unwrap();
    seller_inbox.recv().await.unwrap();
    buyer_inbox.recv().await.unwrap();

    store
        .send_message(&conversation_id, &user("buyer"), "hi!")
        .await
        .unwrap();

    assert_eq!(seller_inbox.recv().await.unwrap()[0].last_message(), "hi!");
    assert_eq!(buyer_inbox.recv().await.unwrap()[0].last_message(), "hi!");
}

// =============================================================================
// Read state
// =============================================================================

#[tokio::test]
async fn opening_the_thread_marks_the_counterparts_messages_read() {
    let (store, repo) = store();
    let conversation_id = store
        .open_conversation(ListingId::new(), user("seller"), user("buyer"))
        .await
        .unwrap();

    store
        .send_message(&conversation_id, &user("buyer"), "ping")
        .await
        .unwrap();
    store
        .send_message(&conversation_id, &user("buyer"), "ping again")
        .await
        .unwrap();
    store
        .send_message(&conversation_id, &user("seller"), "pong")
        .await
        .unwrap();

    // The seller opens the conversation.
    let flipped = store
        .mark_messages_as_read(&conversation_id, &user("seller"))
        .await
        .unwrap();
    assert_eq!(flipped, 2);

    // The seller's own message is untouched and still unread for the buyer.
    let unread_for_buyer = repo
        .unread_messages(&conversation_id, &user("buyer"))
        .await
        .unwrap();
    assert_eq!(unread_for_buyer.len(), 1);

    // Nothing is left unread for the seller.
    let unread_for_seller = repo
        .unread_messages(&conversation_id, &user("seller"))
        .await
        .unwrap();
    assert!(unread_for_seller.is_empty());
}
