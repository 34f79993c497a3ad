//! Integration tests for the MITM attack simulation.
//!
//! A third party (mallory) intercepts messages between alice and bob,
//! guessing keys. Covers the success criterion (exact match against the
//! cipher's canonical plaintext), message rewriting with the real shared
//! key, the append-only audit trail, and a concurrent send/attack race on
//! the same conversation.

use std::sync::Arc;

use cryptolab_core::cipher::CipherType;
use cryptolab_core::key::{HillKey, Key};
use cryptolab_sim::messaging::MessagingSimulator;
use cryptolab_sim::mitm::MitmSimulator;
use cryptolab_sim::record::Message;
use cryptolab_sim::store::{ConversationStore, MemoryStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Lab {
    messaging: MessagingSimulator<MemoryStore>,
    mitm: MitmSimulator<MemoryStore>,
}

/// Creates a shared store with a messaging and a MITM simulator over it.
async fn create_lab() -> Lab {
    let store = Arc::new(MemoryStore::new());
    for name in ["alice", "bob"] {
        store.register_peer(name).await.unwrap();
    }
    Lab {
        messaging: MessagingSimulator::new(Arc::clone(&store)),
        mitm: MitmSimulator::new(store),
    }
}

/// Opens a conversation and sends one message, returning the message.
async fn send_one(lab: &Lab, cipher: CipherType, key: Key, plaintext: &str) -> Message {
    let conv = lab
        .messaging
        .create_conversation("alice", "bob", cipher, key)
        .await
        .unwrap();
    lab.messaging.send(conv.id, "alice", plaintext).await.unwrap()
}

#[tokio::test]
async fn guessing_the_shared_key_always_succeeds() {
    let lab = create_lab().await;
    let cases = [
        (CipherType::Caesar, Key::Caesar { shift: 11 }),
        (CipherType::Affine, Key::Affine { a: 21, b: 13 }),
        (
            CipherType::Hill,
            Key::Hill { key: HillKey::Matrix(vec![vec![3, 3], vec![2, 5]]) },
        ),
        (CipherType::Playfair, Key::Playfair { keyword: "monarchy".into() }),
    ];

    for (cipher, key) in cases {
        let message = send_one(&lab, cipher, key.clone(), "the package is in the usual place").await;
        let interception = lab
            .mitm
            .attack("mallory", message.id, key, None)
            .await
            .unwrap();
        assert!(interception.success, "{cipher} attack with the shared key must succeed");
    }
}

#[tokio::test]
async fn wrong_key_fails_on_long_text() {
    let lab = create_lab().await;
    let message = send_one(
        &lab,
        CipherType::Caesar,
        Key::Caesar { shift: 3 },
        "a sufficiently long plaintext makes key collisions practically impossible",
    )
    .await;

    for shift in (0..26u8).filter(|s| *s != 3) {
        let interception = lab
            .mitm
            .attack("mallory", message.id, Key::Caesar { shift }, None)
            .await
            .unwrap();
        assert!(!interception.success, "shift {shift} must not match");
    }
}

#[tokio::test]
async fn successful_attack_rewrites_what_the_receiver_reads() {
    let lab = create_lab().await;
    let shared = Key::Playfair { keyword: "MONARCHY".into() };
    let message = send_one(&lab, CipherType::Playfair, shared.clone(), "attack at dawn").await;

    let interception = lab
        .mitm
        .attack("mallory", message.id, shared.clone(), Some("retreat at once"))
        .await
        .unwrap();
    assert!(interception.success);
    let new_ciphertext = interception.modified_ciphertext.clone().unwrap();
    assert_ne!(new_ciphertext, message.ciphertext);

    // Bob decrypts with the real shared key and reads the injected text
    // in its canonical digraph form (13 letters, padded to 14).
    let received = lab
        .messaging
        .decrypt_for_receiver(message.id, &shared)
        .await
        .unwrap();
    assert_eq!(received.text, "RETREATATONCEX");

    let stored = lab
        .messaging
        .list_messages(message.conversation_id)
        .await
        .unwrap();
    assert!(stored[0].was_intercepted);
    assert_eq!(stored[0].ciphertext, new_ciphertext);
}

#[tokio::test]
async fn failed_attack_leaves_no_trace_on_the_message() {
    let lab = create_lab().await;
    let message = send_one(
        &lab,
        CipherType::Affine,
        Key::Affine { a: 5, b: 8 },
        "nothing to see here",
    )
    .await;

    let interception = lab
        .mitm
        .attack("mallory", message.id, Key::Affine { a: 7, b: 1 }, Some("hijacked"))
        .await
        .unwrap();
    assert!(!interception.success);
    assert!(interception.modified_ciphertext.is_none());

    let stored = lab
        .messaging
        .list_messages(message.conversation_id)
        .await
        .unwrap();
    assert!(!stored[0].was_intercepted);
    assert_eq!(stored[0].ciphertext, message.ciphertext);
}

#[tokio::test]
async fn audit_trail_is_append_only_and_newest_first() {
    let lab = create_lab().await;
    let message = send_one(
        &lab,
        CipherType::Caesar,
        Key::Caesar { shift: 4 },
        "audited exchange",
    )
    .await;

    for shift in [1u8, 2, 4] {
        lab.mitm
            .attack("mallory", message.id, Key::Caesar { shift }, None)
            .await
            .unwrap();
    }

    let interceptions = lab.mitm.interceptions().await;
    assert_eq!(interceptions.len(), 3);
    // Newest first: the final (successful) shift-4 attempt leads.
    assert!(interceptions[0].success);
    assert!(!interceptions[1].success);
    assert!(!interceptions[2].success);

    // Reading twice without a new attack yields the identical list.
    assert_eq!(lab.mitm.interceptions().await, interceptions);

    // Every attempt carries its step trace.
    for interception in &interceptions {
        assert!(!interception.attack_steps.is_empty());
    }
}

#[tokio::test]
async fn concurrent_send_and_attack_keep_the_store_consistent() {
    let lab = create_lab().await;
    let shared = Key::Caesar { shift: 8 };
    let conv = lab
        .messaging
        .create_conversation("alice", "bob", CipherType::Caesar, shared.clone())
        .await
        .unwrap();
    let target = lab
        .messaging
        .send(conv.id, "alice", "rewrite me")
        .await
        .unwrap();

    let lab = Arc::new(lab);
    let attack = {
        let lab = Arc::clone(&lab);
        let key = shared.clone();
        tokio::spawn(async move {
            lab.mitm
                .attack("mallory", target.id, key, Some("rewritten"))
                .await
        })
    };
    let sends = {
        let lab = Arc::clone(&lab);
        tokio::spawn(async move {
            for i in 0..8 {
                lab.messaging
                    .send(conv.id, "bob", &format!("chatter {i}"))
                    .await
                    .unwrap();
            }
        })
    };

    attack.await.unwrap().unwrap();
    sends.await.unwrap();

    // One rewritten message, eight untouched ones, all decryptable.
    let messages = lab.messaging.list_messages(conv.id).await.unwrap();
    assert_eq!(messages.len(), 9);
    let intercepted: Vec<_> = messages.iter().filter(|m| m.was_intercepted).collect();
    assert_eq!(intercepted.len(), 1);
    for message in &messages {
        let decrypted = lab
            .messaging
            .decrypt_for_receiver(message.id, &shared)
            .await
            .unwrap();
        let expected = if message.was_intercepted { "rewritten" } else { message.plaintext.as_str() };
        assert_eq!(decrypted.text, expected);
    }
}
