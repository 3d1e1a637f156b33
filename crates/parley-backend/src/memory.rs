use async_trait::async_trait;
use parley_types::{GraphInput, Message, MessageChunk, RunConfig, StreamMode, ThreadState};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{BackendError, Result};
use crate::traits::{ChunkStream, ConversationBackend, ThreadRegistry};

/// Produces the assistant reply for the latest input, given the thread so far
pub type Responder = Arc<dyn Fn(&[Message]) -> String + Send + Sync>;

#[derive(Default)]
struct Store {
    order: Vec<String>,
    threads: HashMap<String, Vec<Message>>,
}

impl Store {
    fn thread_mut(&mut self, thread_id: &str) -> &mut Vec<Message> {
        if !self.threads.contains_key(thread_id) {
            self.order.push(thread_id.to_string());
        }
        self.threads.entry(thread_id.to_string()).or_default()
    }
}

/// Process-local backend for development and tests
///
/// Keeps every thread in memory, streams the responder's reply word by word
/// and stores the reply once the stream has been fully produced.
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<RwLock<Store>>,
    responder: Responder,
    fragment_delay: Duration,
    fail_after: Option<usize>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            responder: Arc::new(echo_reply),
            fragment_delay: Duration::ZERO,
            fail_after: None,
        }
    }

    /// Backend preloaded with threads, registered in the given order
    pub fn with_threads(threads: Vec<(String, Vec<Message>)>) -> Self {
        let mut store = Store::default();
        for (thread_id, messages) in threads {
            store.thread_mut(&thread_id).extend(messages);
        }

        Self {
            store: Arc::new(RwLock::new(store)),
            ..Self::new()
        }
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&[Message]) -> String + Send + Sync + 'static,
    {
        self.responder = Arc::new(responder);
        self
    }

    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Make every stream fail after yielding `fragments` fragments
    pub fn fail_streams_after(mut self, fragments: usize) -> Self {
        self.fail_after = Some(fragments);
        self
    }

    pub async fn messages(&self, thread_id: &str) -> Vec<Message> {
        self.store
            .read()
            .await
            .threads
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn echo_reply(messages: &[Message]) -> String {
    let last = messages
        .iter()
        .rev()
        .find(|m| m.is_human())
        .map(|m| m.content().to_text())
        .unwrap_or_default();
    format!("You said: {last}")
}

/// Split on spaces, keeping each space attached so fragments concatenate back
fn fragments(reply: &str) -> Vec<String> {
    reply.split_inclusive(' ').map(str::to_string).collect()
}

#[async_trait]
impl ConversationBackend for InMemoryBackend {
    async fn get_state(&self, config: &RunConfig) -> Result<ThreadState> {
        let store = self.store.read().await;
        let messages = store
            .threads
            .get(config.thread_id())
            .cloned()
            .unwrap_or_default();
        Ok(ThreadState::new(messages))
    }

    async fn stream(
        &self,
        input: GraphInput,
        config: RunConfig,
        _mode: StreamMode,
    ) -> Result<ChunkStream> {
        let thread_id = config.thread_id().to_string();

        let reply = {
            let mut store = self.store.write().await;
            let thread = store.thread_mut(&thread_id);
            thread.extend(input.messages);
            (self.responder)(thread)
        };

        let store = Arc::clone(&self.store);
        let delay = self.fragment_delay;
        let fail_after = self.fail_after;

        Ok(Box::pin(async_stream::stream! {
            for (index, fragment) in fragments(&reply).into_iter().enumerate() {
                if fail_after == Some(index) {
                    yield Err(BackendError::Stream(format!(
                        "reply generation aborted after {index} fragments"
                    )));
                    return;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(MessageChunk::new(fragment)
                    .with_metadata("thread_id", serde_json::Value::String(thread_id.clone())));
            }

            store.write().await.thread_mut(&thread_id).push(Message::ai(reply));
        }))
    }
}

#[async_trait]
impl ThreadRegistry for InMemoryBackend {
    async fn retrieve_all_threads(&self) -> Result<Vec<String>> {
        Ok(self.store.read().await.order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_concatenate_back() {
        let reply = "You said: hello  world ";
        assert_eq!(fragments(reply).concat(), reply);
        assert_eq!(fragments("one"), vec!["one"]);
    }

    #[test]
    fn test_echo_uses_latest_human_message() {
        let messages = vec![Message::human("first"), Message::ai("x"), Message::human("second")];
        assert_eq!(echo_reply(&messages), "You said: second");
    }
}
