//! Messaging simulator: sending and receiving encrypted messages over a
//! conversation's shared key.
//!
//! Pipeline for a send: load the conversation, check the sender is a
//! participant, encrypt with the shared key via the cipher engine, store
//! plaintext + ciphertext + step trace. Receiving is pull-based: the
//! caller supplies the key (normally the shared key) and the message is
//! never mutated.

use std::sync::Arc;

use cryptolab_core::cipher::{self, CipherError, CipherOutput, CipherType};
use cryptolab_core::key::{Key, KeyError};

use crate::record::{Conversation, ConversationId, Message, MessageId};
use crate::store::{ConversationStore, StoreError};

/// Errors from the messaging and MITM simulators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// The store could not satisfy the request (stale client state).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A key failed validation.
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),

    /// A cipher operation failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The acting user is not a participant in the conversation.
    #[error("'{user}' is not a participant in conversation {conversation}")]
    NotParticipant {
        /// The acting user.
        user: String,
        /// The conversation they tried to act on.
        conversation: ConversationId,
    },
}

/// Orchestrates conversations and message exchange over a store.
pub struct MessagingSimulator<S> {
    store: Arc<S>,
}

impl<S: ConversationStore> MessagingSimulator<S> {
    /// Creates a simulator over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a conversation between `creator` and `peer`, or returns the
    /// existing one for the same unordered pair + cipher.
    ///
    /// The shared key is validated against the cipher before anything is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Key`] for an invalid or mismatched key and
    /// [`SimError::Store`] when either peer is unregistered.
    pub async fn create_conversation(
        &self,
        creator: &str,
        peer: &str,
        cipher: CipherType,
        shared_key: Key,
    ) -> Result<Conversation, SimError> {
        shared_key.validate_for(cipher)?;
        for name in [creator, peer] {
            if !self.store.peer_exists(name).await {
                return Err(StoreError::PeerNotFound(name.to_string()).into());
            }
        }

        if let Some(existing) = self.store.find_conversation(creator, peer, cipher).await {
            tracing::debug!(conversation = %existing.id, "reusing existing conversation");
            return Ok(existing);
        }

        let conversation = Conversation::new(creator, peer, cipher, shared_key);
        self.store.insert_conversation(conversation.clone()).await?;
        tracing::info!(
            conversation = %conversation.id,
            %cipher,
            "created conversation between {creator} and {peer}"
        );
        Ok(conversation)
    }

    /// Encrypts `plaintext` with the conversation's shared key and appends
    /// the message.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotParticipant`] when `sender` is not part of
    /// the conversation, and [`SimError::Cipher`] for empty input.
    pub async fn send(
        &self,
        conversation_id: ConversationId,
        sender: &str,
        plaintext: &str,
    ) -> Result<Message, SimError> {
        let conversation = self.store.conversation(conversation_id).await?;
        if !conversation.has_participant(sender) {
            return Err(SimError::NotParticipant {
                user: sender.to_string(),
                conversation: conversation_id,
            });
        }

        let encrypted = cipher::encrypt(conversation.cipher, plaintext, &conversation.shared_key)?;
        let message = Message::new(
            conversation_id,
            sender,
            plaintext,
            encrypted.text,
            encrypted.steps,
        );
        self.store.append_message(message.clone()).await?;
        tracing::info!(
            message = %message.id,
            conversation = %conversation_id,
            sender,
            "message sent"
        );
        Ok(message)
    }

    /// Decrypts a stored message with the caller-supplied key.
    ///
    /// Normally the caller passes the shared key; passing anything else
    /// yields whatever that key decrypts to. The message is not mutated.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Store`] for an unknown message and
    /// [`SimError::Cipher`] for an invalid key.
    pub async fn decrypt_for_receiver(
        &self,
        message_id: MessageId,
        key: &Key,
    ) -> Result<CipherOutput, SimError> {
        let message = self.store.message(message_id).await?;
        let conversation = self.store.conversation(message.conversation_id).await?;
        Ok(cipher::decrypt(conversation.cipher, &message.ciphertext, key)?)
    }

    /// Lists a conversation's messages in send order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Store`] for an unknown conversation.
    pub async fn list_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, SimError> {
        Ok(self.store.messages_in(conversation_id).await?)
    }

    /// Deletes a conversation and all of its messages.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Store`] for an unknown conversation.
    pub async fn delete_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<(), SimError> {
        self.store.delete_conversation(conversation_id).await?;
        tracing::info!(conversation = %conversation_id, "conversation deleted");
        Ok(())
    }
}
