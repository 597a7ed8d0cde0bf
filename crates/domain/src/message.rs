use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::turn::ResponseMetrics;

/// Who produced a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    Tool,
}

/// A single turn of dialogue within a [`crate::Conversation`] (§3).
///
/// Messages are append-only within a turn and never mutated after commit
/// (I2/I5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Search passage attached when the turn was routed through the Search
    /// Manager.
    pub search_passage: Option<String>,
    /// Name of the tool invoked, when `role` is `Tool`.
    pub tool_name: Option<String>,
    /// Present only on assistant messages.
    pub metrics: Option<ResponseMetrics>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp,
            search_passage: None,
            tool_name: None,
            metrics: None,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>, metrics: ResponseMetrics) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
            search_passage: None,
            tool_name: None,
            metrics: Some(metrics),
        }
    }

    pub fn tool(tool_name: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            timestamp,
            search_passage: None,
            tool_name: Some(tool_name.into()),
            metrics: None,
        }
    }

    pub fn with_search_passage(mut self, passage: impl Into<String>) -> Self {
        self.search_passage = Some(passage.into());
        self
    }
}
