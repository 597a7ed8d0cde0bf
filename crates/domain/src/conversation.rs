use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// A conversation thread: an ordered sequence of [`Message`]s tied to one
/// [`crate::Model`] and one [`crate::Prompt`] (§3).
///
/// The conversation exclusively owns its messages; deleting it deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub display_name: String,
    pub model_id: String,
    pub prompt_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived: bool,
}

impl Conversation {
    pub fn new(display_name: impl Into<String>, model_id: impl Into<String>, prompt_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            model_id: model_id.into(),
            prompt_id: prompt_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    /// Append a message, maintaining the strictly non-decreasing timestamp
    /// invariant (I1) by clamping to the last recorded timestamp.
    pub fn push(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last()
            && message.timestamp < last.timestamp
        {
            message.timestamp = last.timestamp;
        }
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }

    /// Messages in chronological order, oldest first (the natural storage
    /// order); kept as a named accessor so callers don't reach into the
    /// field directly when slicing windows.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }
}
