//! Conversation storage behind the [`ConversationStore`] trait.
//!
//! The engine treats persistence as an external collaborator; this trait
//! is the interface it needs, and [`MemoryStore`] is the in-memory
//! implementation the simulators and tests run against. Every mutation
//! takes the write lock, so a `send` and a concurrent attack's
//! re-encryption on the same conversation can never interleave.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use cryptolab_core::cipher::CipherType;

use crate::record::{Conversation, ConversationId, Interception, Message, MessageId};

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No conversation with that id.
    #[error("conversation {0} not found")]
    ConversationNotFound(ConversationId),

    /// No message with that id.
    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    /// The named peer is not registered.
    #[error("peer '{0}' not found")]
    PeerNotFound(String),

    /// A peer with that name is already registered.
    #[error("peer '{0}' already exists")]
    PeerExists(String),
}

/// Interface the simulators need from a conversation store.
///
/// Implementations must serialize mutations per conversation: a message
/// append and an attack's ciphertext rewrite on the same conversation may
/// not interleave.
pub trait ConversationStore: Send + Sync {
    /// Registers a peer name in the directory.
    fn register_peer(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Whether a peer name is registered.
    fn peer_exists(&self, name: &str) -> impl std::future::Future<Output = bool> + Send;

    /// Finds an existing conversation for the unordered pair + cipher.
    fn find_conversation(
        &self,
        one: &str,
        other: &str,
        cipher: CipherType,
    ) -> impl std::future::Future<Output = Option<Conversation>> + Send;

    /// Inserts a new conversation.
    fn insert_conversation(
        &self,
        conversation: Conversation,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Fetches a conversation by id.
    fn conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Conversation, StoreError>> + Send;

    /// Lists the conversations a participant belongs to.
    fn conversations_for(
        &self,
        participant: &str,
    ) -> impl std::future::Future<Output = Vec<Conversation>> + Send;

    /// Deletes a conversation and all of its messages.
    fn delete_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Appends a message to its conversation.
    fn append_message(
        &self,
        message: Message,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Fetches a message by id.
    fn message(
        &self,
        id: MessageId,
    ) -> impl std::future::Future<Output = Result<Message, StoreError>> + Send;

    /// Lists a conversation's messages in send order.
    fn messages_in(
        &self,
        conversation: ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Replaces a message's ciphertext after a successful attack and marks
    /// it intercepted. This is the only mutation a message ever sees.
    fn commit_attack(
        &self,
        id: MessageId,
        new_ciphertext: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Appends an interception to the audit trail.
    fn record_interception(
        &self,
        interception: Interception,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Lists all interceptions, newest first.
    fn interceptions(&self) -> impl std::future::Future<Output = Vec<Interception>> + Send;
}

/// Inner state guarded by one lock.
#[derive(Default)]
struct State {
    peers: HashSet<String>,
    conversations: HashMap<ConversationId, Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    message_index: HashMap<MessageId, ConversationId>,
    interceptions: Vec<Interception>,
}

/// In-memory [`ConversationStore`].
///
/// Thread-safe via [`RwLock`]; all state lives behind a single lock, so
/// every mutation is serialized and reads see consistent snapshots.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }
}

impl ConversationStore for MemoryStore {
    async fn register_peer(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.peers.insert(name.to_string()) {
            return Err(StoreError::PeerExists(name.to_string()));
        }
        drop(state);
        Ok(())
    }

    async fn peer_exists(&self, name: &str) -> bool {
        self.state.read().await.peers.contains(name)
    }

    async fn find_conversation(
        &self,
        one: &str,
        other: &str,
        cipher: CipherType,
    ) -> Option<Conversation> {
        let state = self.state.read().await;
        state
            .conversations
            .values()
            .find(|c| c.cipher == cipher && c.joins(one, other))
            .cloned()
    }

    async fn insert_conversation(&self, conversation: Conversation) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.messages.entry(conversation.id).or_default();
        state.conversations.insert(conversation.id, conversation);
        drop(state);
        Ok(())
    }

    async fn conversation(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        self.state
            .read()
            .await
            .conversations
            .get(&id)
            .cloned()
            .ok_or(StoreError::ConversationNotFound(id))
    }

    async fn conversations_for(&self, participant: &str) -> Vec<Conversation> {
        let state = self.state.read().await;
        let mut found: Vec<Conversation> = state
            .conversations
            .values()
            .filter(|c| c.has_participant(participant))
            .cloned()
            .collect();
        found.sort_by_key(|c| c.created_at);
        found
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.conversations.remove(&id).is_none() {
            return Err(StoreError::ConversationNotFound(id));
        }
        if let Some(messages) = state.messages.remove(&id) {
            for message in &messages {
                state.message_index.remove(&message.id);
            }
        }
        drop(state);
        Ok(())
    }

    async fn append_message(&self, message: Message) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let conversation_id = message.conversation_id;
        if !state.conversations.contains_key(&conversation_id) {
            return Err(StoreError::ConversationNotFound(conversation_id));
        }
        state.message_index.insert(message.id, conversation_id);
        state.messages.entry(conversation_id).or_default().push(message);
        drop(state);
        Ok(())
    }

    async fn message(&self, id: MessageId) -> Result<Message, StoreError> {
        let state = self.state.read().await;
        let conversation_id = state
            .message_index
            .get(&id)
            .ok_or(StoreError::MessageNotFound(id))?;
        state
            .messages
            .get(conversation_id)
            .and_then(|msgs| msgs.iter().find(|m| m.id == id))
            .cloned()
            .ok_or(StoreError::MessageNotFound(id))
    }

    async fn messages_in(&self, conversation: ConversationId) -> Result<Vec<Message>, StoreError> {
        let state = self.state.read().await;
        if !state.conversations.contains_key(&conversation) {
            return Err(StoreError::ConversationNotFound(conversation));
        }
        Ok(state.messages.get(&conversation).cloned().unwrap_or_default())
    }

    async fn commit_attack(&self, id: MessageId, new_ciphertext: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let conversation_id = *state
            .message_index
            .get(&id)
            .ok_or(StoreError::MessageNotFound(id))?;
        let message = state
            .messages
            .get_mut(&conversation_id)
            .and_then(|msgs| msgs.iter_mut().find(|m| m.id == id))
            .ok_or(StoreError::MessageNotFound(id))?;
        message.ciphertext = new_ciphertext.to_string();
        message.was_intercepted = true;
        drop(state);
        Ok(())
    }

    async fn record_interception(&self, interception: Interception) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.interceptions.push(interception);
        drop(state);
        Ok(())
    }

    async fn interceptions(&self) -> Vec<Interception> {
        let state = self.state.read().await;
        state.interceptions.iter().rev().cloned().collect()
    }
}
