use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::message::Message;

/// Input for one graph run: the new messages to append to the thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub messages: Vec<Message>,
}

impl GraphInput {
    /// Input holding a single human message
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(content.into())],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateValues {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Stored state of a thread as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    #[serde(default)]
    pub values: StateValues,
}

impl ThreadState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            values: StateValues { messages },
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.values.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.values.messages
    }
}

/// One streamed fragment of the assistant reply plus its run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageChunk {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl MessageChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
