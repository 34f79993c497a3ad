//! Integration tests for the messaging simulation.
//!
//! Covers the full send/receive path over a shared store: conversation
//! creation (idempotent per unordered pair + cipher), encryption with the
//! shared key, pull-based receiver decryption, ordering, cascade delete,
//! and concurrent sends on one conversation.

use std::sync::Arc;

use cryptolab_core::cipher::CipherType;
use cryptolab_core::key::{HillKey, Key};
use cryptolab_sim::messaging::MessagingSimulator;
use cryptolab_sim::store::{ConversationStore, MemoryStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Creates a store with alice and bob registered, plus a simulator over it.
async fn create_lab() -> (Arc<MemoryStore>, MessagingSimulator<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for name in ["alice", "bob"] {
        store.register_peer(name).await.unwrap();
    }
    (Arc::clone(&store), MessagingSimulator::new(store))
}

#[tokio::test]
async fn send_and_receive_over_every_cipher() {
    let (_, sim) = create_lab().await;

    let cases = [
        (CipherType::Caesar, Key::Caesar { shift: 3 }),
        (CipherType::Affine, Key::Affine { a: 5, b: 8 }),
        (
            CipherType::Hill,
            Key::Hill { key: HillKey::Matrix(vec![vec![3, 3], vec![2, 5]]) },
        ),
        (CipherType::Playfair, Key::Playfair { keyword: "MONARCHY".into() }),
    ];

    for (cipher, key) in cases {
        let conv = sim
            .create_conversation("alice", "bob", cipher, key.clone())
            .await
            .unwrap();
        let message = sim.send(conv.id, "alice", "MEET AT DAWN").await.unwrap();
        assert_ne!(message.ciphertext, message.plaintext, "{cipher} must change the text");

        let received = sim.decrypt_for_receiver(message.id, &key).await.unwrap();
        // Caesar/Affine give back the exact text; Hill/Playfair the
        // letters-only canonical form.
        match cipher {
            CipherType::Caesar | CipherType::Affine => {
                assert_eq!(received.text, "MEET AT DAWN");
            }
            CipherType::Hill | CipherType::Playfair => {
                assert!(received.text.starts_with("MEETATDAWN"));
            }
        }
    }
}

#[tokio::test]
async fn conversations_are_reused_per_unordered_pair_and_cipher() {
    let (_, sim) = create_lab().await;
    let key = Key::Caesar { shift: 5 };

    let first = sim
        .create_conversation("alice", "bob", CipherType::Caesar, key.clone())
        .await
        .unwrap();
    let reversed = sim
        .create_conversation("bob", "alice", CipherType::Caesar, key.clone())
        .await
        .unwrap();
    assert_eq!(first.id, reversed.id);

    // A different cipher opens a separate conversation.
    let affine = sim
        .create_conversation("alice", "bob", CipherType::Affine, Key::Affine { a: 7, b: 2 })
        .await
        .unwrap();
    assert_ne!(first.id, affine.id);
}

#[tokio::test]
async fn both_participants_can_send_and_order_is_preserved() {
    let (_, sim) = create_lab().await;
    let conv = sim
        .create_conversation("alice", "bob", CipherType::Caesar, Key::Caesar { shift: 1 })
        .await
        .unwrap();

    sim.send(conv.id, "alice", "first").await.unwrap();
    sim.send(conv.id, "bob", "second").await.unwrap();
    sim.send(conv.id, "alice", "third").await.unwrap();

    let messages = sim.list_messages(conv.id).await.unwrap();
    let senders: Vec<&str> = messages.iter().map(|m| m.sender.as_str()).collect();
    assert_eq!(senders, vec!["alice", "bob", "alice"]);
    let texts: Vec<&str> = messages.iter().map(|m| m.plaintext.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn deleting_a_conversation_removes_its_messages() {
    let (_, sim) = create_lab().await;
    let conv = sim
        .create_conversation("alice", "bob", CipherType::Caesar, Key::Caesar { shift: 2 })
        .await
        .unwrap();
    let message = sim.send(conv.id, "alice", "ephemeral").await.unwrap();

    sim.delete_conversation(conv.id).await.unwrap();
    assert!(sim.list_messages(conv.id).await.is_err());
    assert!(
        sim.decrypt_for_receiver(message.id, &Key::Caesar { shift: 2 })
            .await
            .is_err()
    );
}

#[tokio::test]
async fn concurrent_sends_all_land_in_the_store() {
    let (store, sim) = create_lab().await;
    let sim = Arc::new(sim);
    let conv = sim
        .create_conversation("alice", "bob", CipherType::Caesar, Key::Caesar { shift: 9 })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let sim = Arc::clone(&sim);
        let conv_id = conv.id;
        handles.push(tokio::spawn(async move {
            let sender = if i % 2 == 0 { "alice" } else { "bob" };
            sim.send(conv_id, sender, &format!("message {i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store.messages_in(conv.id).await.unwrap();
    assert_eq!(stored.len(), 16);
    // Every stored ciphertext decrypts cleanly with the shared key.
    for message in stored {
        let decrypted = sim
            .decrypt_for_receiver(message.id, &Key::Caesar { shift: 9 })
            .await
            .unwrap();
        assert_eq!(decrypted.text, message.plaintext);
    }
}
