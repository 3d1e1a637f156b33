use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Run name attached to every chat turn sent to the backend
pub const CHAT_TURN_RUN_NAME: &str = "chat_turn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configurable {
    pub thread_id: String,
}

/// Per-call configuration handed to the conversational backend
///
/// `configurable.thread_id` selects the conversation; `metadata` and
/// `run_name` only label the run for the backend's own tracing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub configurable: Configurable,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_name: Option<String>,
}

impl RunConfig {
    /// Config addressing a thread, as used for state lookups
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            configurable: Configurable {
                thread_id: thread_id.into(),
            },
            metadata: HashMap::new(),
            run_name: None,
        }
    }

    /// Config for a streamed chat turn on a thread
    pub fn chat_turn(thread_id: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        let mut metadata = HashMap::new();
        metadata.insert(
            "thread_id".to_string(),
            serde_json::Value::String(thread_id.clone()),
        );

        Self {
            configurable: Configurable { thread_id },
            metadata,
            run_name: Some(CHAT_TURN_RUN_NAME.to_string()),
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.configurable.thread_id
    }
}

/// What the backend stream yields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    /// Message fragments as they are generated
    #[default]
    Messages,
    /// Full state snapshots after each step
    Values,
}

impl StreamMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Messages => "messages",
            StreamMode::Values => "values",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_turn_carries_thread_everywhere() {
        let config = RunConfig::chat_turn("t-1");

        assert_eq!(config.thread_id(), "t-1");
        assert_eq!(config.metadata["thread_id"], "t-1");
        assert_eq!(config.run_name.as_deref(), Some("chat_turn"));
    }

    #[test]
    fn test_for_thread_serialization() {
        let json = serde_json::to_value(RunConfig::for_thread("abc")).unwrap();

        assert_eq!(json["configurable"]["thread_id"], "abc");
        assert!(json.get("run_name").is_none());
    }
}
