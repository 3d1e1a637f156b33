use serde::{Deserialize, Serialize};
use std::fmt;

use crate::message::Message;

/// Display role of a chat record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the displayed conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub role: Role,
    pub content: String,
}

impl ChatRecord {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// Human-authored messages display as `user`; everything else the backend
// stores (AI, system, tool) displays as `assistant`.
impl From<&Message> for ChatRecord {
    fn from(message: &Message) -> Self {
        let role = if message.is_human() {
            Role::User
        } else {
            Role::Assistant
        };

        Self {
            role,
            content: message.content().to_text(),
        }
    }
}

impl From<Message> for ChatRecord {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}
