//! Man-in-the-middle attack simulator.
//!
//! One attack is a one-shot state machine: intercept a stored message,
//! decrypt it with a guessed key, judge success by exact comparison with
//! the real plaintext (in the form the cipher itself reduces it to), and
//! on success optionally re-encrypt a replacement with the conversation's
//! real shared key and rewrite the message. Every attempt — success or
//! failure — is recorded on an append-only audit trail. Retries belong to
//! the caller; there is no attacker session here.

use std::sync::Arc;

use cryptolab_core::cipher;
use cryptolab_core::key::Key;

use crate::messaging::SimError;
use crate::record::{Interception, InterceptionId, MessageId, Timestamp};
use crate::store::ConversationStore;

/// Orchestrates attack attempts over a store shared with the messaging
/// simulator.
pub struct MitmSimulator<S> {
    store: Arc<S>,
}

impl<S: ConversationStore> MitmSimulator<S> {
    /// Creates a simulator over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Runs one attack attempt against a stored message.
    ///
    /// The attacker supplies a guessed key and, optionally, a replacement
    /// plaintext to inject if the guess turns out to be right. Success is
    /// judged by exact match between the guessed decryption and the
    /// canonical form of the message's real plaintext — the attacker has
    /// no oracle beyond the text looking identical.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Store`] for an unknown message and
    /// [`SimError::Cipher`] when the attacker key is malformed for the
    /// conversation's cipher (a malformed request records no interception).
    pub async fn attack(
        &self,
        attacker: &str,
        message_id: MessageId,
        attacker_key: Key,
        modified_plaintext: Option<&str>,
    ) -> Result<Interception, SimError> {
        let message = self.store.message(message_id).await?;
        let conversation = self.store.conversation(message.conversation_id).await?;

        attacker_key.validate_for(conversation.cipher)?;

        let mut attack_steps = vec![
            format!("intercepted message {} from {}", message.id, message.sender),
            format!("ciphertext: {}", message.ciphertext),
            format!("cipher type: {}", conversation.cipher),
            format!("attacker key: {attacker_key}"),
            "-- decryption attempt --".to_string(),
        ];

        let guess = cipher::decrypt(conversation.cipher, &message.ciphertext, &attacker_key)?;
        attack_steps.extend(guess.steps.iter().cloned());

        let reference = cipher::canonical_plaintext(
            conversation.cipher,
            &message.plaintext,
            &conversation.shared_key,
        )?;
        let success = guess.text == reference;
        attack_steps.push(format!("decrypted guess: {}", guess.text));
        attack_steps.push(format!("original plaintext: {reference}"));
        attack_steps.push(format!("attack success: {success}"));

        let mut modified_ciphertext = None;
        if let (true, Some(modified)) = (success, modified_plaintext) {
            let reencrypted =
                cipher::encrypt(conversation.cipher, modified, &conversation.shared_key)?;
            attack_steps.push("-- re-encryption with the real shared key --".to_string());
            attack_steps.extend(reencrypted.steps.iter().cloned());
            attack_steps.push(format!("replacement ciphertext: {}", reencrypted.text));
            self.store.commit_attack(message.id, &reencrypted.text).await?;
            modified_ciphertext = Some(reencrypted.text);
        }

        let interception = Interception {
            id: InterceptionId::new(),
            attacker: attacker.to_string(),
            message_id: message.id,
            attacker_key,
            decrypted_plaintext: guess.text,
            success,
            modified_plaintext: modified_plaintext.map(ToString::to_string),
            modified_ciphertext,
            attack_steps,
            timestamp: Timestamp::now(),
        };
        self.store.record_interception(interception.clone()).await?;
        tracing::info!(
            interception = %interception.id,
            message = %message_id,
            attacker,
            success,
            "attack attempt recorded"
        );
        Ok(interception)
    }

    /// Lists every recorded interception, newest first.
    pub async fn interceptions(&self) -> Vec<Interception> {
        self.store.interceptions().await
    }
}
