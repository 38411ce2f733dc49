/// Integration tests for conversations and read-state tracking
///
/// These cover the messaging behaviors clients depend on:
/// - find-or-create returns the same 1:1 conversation on repeat calls
/// - unread counts exclude the caller's own messages
/// - retrieving a conversation bulk-marks messages read, and the shared
///   flag clears the count for every participant (including ones who never
///   opened it)
///
/// Run with a database: see tests/common/mod.rs for setup.

mod common;

use common::{create_student, try_test_pool};
use projecthub_shared::models::{conversation::Conversation, message::Message};

#[tokio::test]
async fn test_find_or_create_returns_same_conversation() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (first, created_first) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");
    assert!(created_first, "first call should create the conversation");
    assert!(!first.is_group);

    let (second, created_second) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");
    assert!(!created_second, "second call must find, not create");
    assert_eq!(first.id, second.id);

    // Order of the pair doesn't matter either
    let (swapped, created_swapped) = Conversation::find_or_create_direct(&pool, bob.id, alice.id)
        .await
        .expect("find-or-create should succeed");
    assert!(!created_swapped);
    assert_eq!(first.id, swapped.id);
}

#[tokio::test]
async fn test_unread_count_excludes_own_messages() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    Message::create(&pool, conversation.id, alice.id, "hi bob")
        .await
        .expect("send should succeed");

    let alice_unread = Conversation::unread_count(&pool, conversation.id, alice.id)
        .await
        .expect("count should succeed");
    let bob_unread = Conversation::unread_count(&pool, conversation.id, bob.id)
        .await
        .expect("count should succeed");

    assert_eq!(alice_unread, 0, "own messages are never unread");
    assert_eq!(bob_unread, 1);
}

#[tokio::test]
async fn test_retrieve_marks_read_for_all_participants() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    // Group conversation with three participants
    let (x, _) = create_student(&pool, "x").await;
    let (y, _) = create_student(&pool, "y").await;
    let (z, _) = create_student(&pool, "z").await;

    let conversation = Conversation::create(&pool, "study group", true, x.id, &[y.id, z.id])
        .await
        .expect("create should succeed");

    Message::create(&pool, conversation.id, x.id, "meeting at noon")
        .await
        .expect("send should succeed");

    assert_eq!(
        Conversation::unread_count(&pool, conversation.id, y.id)
            .await
            .expect("count should succeed"),
        1
    );
    assert_eq!(
        Conversation::unread_count(&pool, conversation.id, z.id)
            .await
            .expect("count should succeed"),
        1
    );

    // Y opens the conversation
    let changed = Conversation::mark_read(&pool, conversation.id, y.id)
        .await
        .expect("mark-read should succeed");
    assert_eq!(changed, 1);

    // The flag is shared per message: Z's count clears too, even though Z
    // never opened the conversation
    assert_eq!(
        Conversation::unread_count(&pool, conversation.id, y.id)
            .await
            .expect("count should succeed"),
        0
    );
    assert_eq!(
        Conversation::unread_count(&pool, conversation.id, z.id)
            .await
            .expect("count should succeed"),
        0
    );
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    Message::create(&pool, conversation.id, alice.id, "ping")
        .await
        .expect("send should succeed");

    let first = Conversation::mark_read(&pool, conversation.id, bob.id)
        .await
        .expect("mark-read should succeed");
    assert_eq!(first, 1);

    let second = Conversation::mark_read(&pool, conversation.id, bob.id)
        .await
        .expect("mark-read should succeed");
    assert_eq!(second, 0, "retry flips nothing new");
}

#[tokio::test]
async fn test_last_message_is_most_recent() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    assert!(Conversation::last_message(&pool, conversation.id)
        .await
        .expect("query should succeed")
        .is_none());

    Message::create(&pool, conversation.id, alice.id, "first")
        .await
        .expect("send should succeed");
    let second = Message::create(&pool, conversation.id, bob.id, "second")
        .await
        .expect("send should succeed");

    let last = Conversation::last_message(&pool, conversation.id)
        .await
        .expect("query should succeed")
        .expect("a message exists");
    assert_eq!(last.id, second.id);
    assert_eq!(last.content, "second");
}

#[tokio::test]
async fn test_messages_listed_oldest_first() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    for content in ["one", "two", "three"] {
        Message::create(&pool, conversation.id, alice.id, content)
            .await
            .expect("send should succeed");
    }

    let messages = Message::list_for_conversation(&pool, conversation.id)
        .await
        .expect("list should succeed");
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_mark_single_message_read() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    let message = Message::create(&pool, conversation.id, alice.id, "ping")
        .await
        .expect("send should succeed");
    assert!(!message.is_read);

    let marked = Message::mark_as_read(&pool, message.id)
        .await
        .expect("mark should succeed");
    assert!(marked);

    let reloaded = Message::find_by_id(&pool, message.id)
        .await
        .expect("query should succeed")
        .expect("message exists");
    assert!(reloaded.is_read);
}

#[tokio::test]
async fn test_sending_bumps_conversation_activity() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (alice, _) = create_student(&pool, "alice").await;
    let (bob, _) = create_student(&pool, "bob").await;

    let (conversation, _) = Conversation::find_or_create_direct(&pool, alice.id, bob.id)
        .await
        .expect("find-or-create should succeed");

    Message::create(&pool, conversation.id, alice.id, "hello")
        .await
        .expect("send should succeed");

    let reloaded = Conversation::find_by_id(&pool, conversation.id)
        .await
        .expect("query should succeed")
        .expect("conversation exists");
    assert!(reloaded.updated_at >= conversation.updated_at);
}
