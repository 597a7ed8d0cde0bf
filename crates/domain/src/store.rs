use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::message::Message;
use crate::model::{Model, Prompt};

/// Everything that can go wrong talking to the external conversation store
/// (§6). Never a panic path: callers surface this as a turn-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation {0} not found")]
    ConversationNotFound(Uuid),
    #[error("model {0} not found")]
    ModelNotFound(String),
    #[error("prompt {0} not found")]
    PromptNotFound(String),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The document-style store the core reads Conversations/Models/Prompts
/// from and appends Messages to (§6). Models and Prompts are read-only to
/// the core; Conversations are the only collection the core mutates.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get_conversation(&self, id: Uuid) -> Result<Conversation, StoreError>;

    /// Atomically replace the messages array and bump `updated_at` — the
    /// one write operation the core performs on a Conversation document.
    async fn append_messages(
        &self,
        id: Uuid,
        messages: Vec<Message>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn get_model(&self, name: &str) -> Result<Model, StoreError>;

    async fn get_prompt(&self, name: &str) -> Result<Prompt, StoreError>;
}

/// Reference in-memory implementation of [`ConversationStore`], used by the
/// orchestrator binary and by tests; not meant for production persistence.
#[derive(Default)]
pub struct InMemoryStore {
    conversations: Mutex<HashMap<Uuid, Conversation>>,
    models: Mutex<HashMap<String, Model>>,
    prompts: Mutex<HashMap<String, Prompt>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_conversation(&self, conversation: Conversation) {
        self.conversations.lock().unwrap().insert(conversation.id, conversation);
    }

    pub fn insert_model(&self, model: Model) {
        self.models.lock().unwrap().insert(model.name.clone(), model);
    }

    pub fn insert_prompt(&self, prompt: Prompt) {
        self.prompts.lock().unwrap().insert(prompt.name.clone(), prompt);
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn get_conversation(&self, id: Uuid) -> Result<Conversation, StoreError> {
        self.conversations
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::ConversationNotFound(id))
    }

    async fn append_messages(
        &self,
        id: Uuid,
        messages: Vec<Message>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .get_mut(&id)
            .ok_or(StoreError::ConversationNotFound(id))?;
        conversation.messages.extend(messages);
        conversation.updated_at = updated_at;
        Ok(())
    }

    async fn get_model(&self, name: &str) -> Result<Model, StoreError> {
        self.models
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::ModelNotFound(name.to_string()))
    }

    async fn get_prompt(&self, name: &str) -> Result<Prompt, StoreError> {
        self.prompts
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::PromptNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capabilities, Pricing, SamplingParams};

    fn sample_model() -> Model {
        Model {
            name: "test-model".to_string(),
            provider: "gemini".to_string(),
            sampling: SamplingParams {
                temperature: 0.7,
                top_p: 0.95,
                max_input_tokens: 32_000,
                max_output_tokens: 4_096,
            },
            capabilities: Capabilities::default(),
            pricing: Pricing::default(),
        }
    }

    #[tokio::test]
    async fn append_messages_is_atomic_and_bumps_updated_at() {
        let store = InMemoryStore::new();
        let conversation = Conversation::new("test", "test-model", "default");
        let id = conversation.id;
        store.insert_conversation(conversation);
        store.insert_model(sample_model());

        let now = Utc::now();
        store
            .append_messages(id, vec![Message::user("hi", now)], now)
            .await
            .unwrap();

        let loaded = store.get_conversation(id).await.unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.updated_at, now);
    }

    #[tokio::test]
    async fn missing_conversation_is_an_error_not_a_panic() {
        let store = InMemoryStore::new();
        let result = store.get_conversation(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::ConversationNotFound(_))));
    }
}
