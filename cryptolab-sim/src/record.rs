//! Conversation, message, and interception records.
//!
//! Entity ids are UUID v7 newtypes for time-ordering; timestamps are
//! millisecond-precision UTC.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cryptolab_core::cipher::CipherType;
use cryptolab_core::key::Key;

/// Unique identifier for a conversation (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Creates a new time-ordered conversation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `ConversationId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new time-ordered message identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `MessageId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an interception record (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptionId(Uuid);

impl InterceptionId {
    /// Creates a new time-ordered interception identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InterceptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InterceptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Millisecond-precision UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp for the current instant.
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Creates a timestamp from milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

/// A conversation between two participants sharing a cipher key.
///
/// The shared key is known to both participants and to no one else by
/// construction — an attacker has to guess it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier.
    pub id: ConversationId,
    /// One participant.
    pub participant_a: String,
    /// The other participant.
    pub participant_b: String,
    /// Cipher used for every message in this conversation.
    pub cipher: CipherType,
    /// The key both participants encrypt and decrypt with.
    pub shared_key: Key,
    /// When the conversation was created.
    pub created_at: Timestamp,
}

impl Conversation {
    /// Creates a conversation record with a fresh id.
    #[must_use]
    pub fn new(
        participant_a: impl Into<String>,
        participant_b: impl Into<String>,
        cipher: CipherType,
        shared_key: Key,
    ) -> Self {
        Self {
            id: ConversationId::new(),
            participant_a: participant_a.into(),
            participant_b: participant_b.into(),
            cipher,
            shared_key,
            created_at: Timestamp::now(),
        }
    }

    /// Whether `user` is one of the two participants.
    #[must_use]
    pub fn has_participant(&self, user: &str) -> bool {
        self.participant_a == user || self.participant_b == user
    }

    /// Whether this conversation joins the same unordered pair of users.
    #[must_use]
    pub fn joins(&self, one: &str, other: &str) -> bool {
        (self.participant_a == one && self.participant_b == other)
            || (self.participant_a == other && self.participant_b == one)
    }
}

/// A message in a conversation.
///
/// Plaintext is stored alongside the ciphertext — this models an
/// idealized channel where the sender always has access to their own
/// sent content, and gives the MITM judge its ground truth. The record is
/// immutable after creation except that a successful attack may replace
/// the ciphertext exactly once and set `was_intercepted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Who sent it (always an explicit parameter, never ambient state).
    pub sender: String,
    /// The original plaintext as typed.
    pub plaintext: String,
    /// The ciphertext produced with the conversation's shared key.
    pub ciphertext: String,
    /// Step trace of the encryption that produced the ciphertext.
    pub encryption_steps: Vec<String>,
    /// Set when a successful MITM attack rewrote the ciphertext.
    pub was_intercepted: bool,
    /// When the message was sent.
    pub sent_at: Timestamp,
}

impl Message {
    /// Creates a message record with a fresh id.
    #[must_use]
    pub fn new(
        conversation_id: ConversationId,
        sender: impl Into<String>,
        plaintext: impl Into<String>,
        ciphertext: impl Into<String>,
        encryption_steps: Vec<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            conversation_id,
            sender: sender.into(),
            plaintext: plaintext.into(),
            ciphertext: ciphertext.into(),
            encryption_steps,
            was_intercepted: false,
            sent_at: Timestamp::now(),
        }
    }
}

/// Append-only audit record of one MITM attack attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interception {
    /// Unique identifier.
    pub id: InterceptionId,
    /// Who ran the attack.
    pub attacker: String,
    /// The message that was attacked.
    pub message_id: MessageId,
    /// The key the attacker guessed.
    pub attacker_key: Key,
    /// What that key decrypted the ciphertext to.
    pub decrypted_plaintext: String,
    /// Whether the guess matched the real plaintext exactly.
    pub success: bool,
    /// Replacement plaintext supplied by the attacker, if any.
    pub modified_plaintext: Option<String>,
    /// The replacement ciphertext written to the message, if any.
    pub modified_ciphertext: Option<String>,
    /// Step trace of the decrypt attempt (and re-encrypt, on success).
    pub attack_steps: Vec<String>,
    /// When the attack ran.
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_participant_checks() {
        let conv = Conversation::new("alice", "bob", CipherType::Caesar, Key::Caesar { shift: 3 });
        assert!(conv.has_participant("alice"));
        assert!(conv.has_participant("bob"));
        assert!(!conv.has_participant("mallory"));
        assert!(conv.joins("bob", "alice"));
        assert!(!conv.joins("alice", "mallory"));
    }

    #[test]
    fn new_message_is_not_intercepted() {
        let conv_id = ConversationId::new();
        let msg = Message::new(conv_id, "alice", "HELLO", "KHOOR", vec![]);
        assert!(!msg.was_intercepted);
        assert_eq!(msg.conversation_id, conv_id);
    }

    #[test]
    fn timestamp_round_trips_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        assert_eq!(ts.as_millis(), 1_700_000_000_000);
    }

    #[test]
    fn ids_display_as_uuids() {
        assert_eq!(ConversationId::new().to_string().len(), 36);
        assert_eq!(MessageId::new().to_string().len(), 36);
        assert_eq!(InterceptionId::new().to_string().len(), 36);
    }
}
