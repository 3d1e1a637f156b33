use async_trait::async_trait;
use futures::Stream;
use parley_types::{GraphInput, MessageChunk, RunConfig, StreamMode, ThreadState};
use std::pin::Pin;

use crate::error::Result;

/// Lazy, finite, non-restartable sequence of reply fragments in generation order
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<MessageChunk>> + Send>>;

/// Conversational-graph backend that owns thread state and generates replies
///
/// Implementations persist the conversation; callers only read state and
/// consume streamed replies.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Stored state of the thread named by `config`
    ///
    /// A thread the backend has never seen yields an empty state, not an error.
    async fn get_state(&self, config: &RunConfig) -> Result<ThreadState>;

    /// Run the graph on `input` and stream the assistant reply
    async fn stream(
        &self,
        input: GraphInput,
        config: RunConfig,
        mode: StreamMode,
    ) -> Result<ChunkStream>;
}

/// Source of every thread id the backend already knows about
#[async_trait]
pub trait ThreadRegistry: Send + Sync {
    async fn retrieve_all_threads(&self) -> Result<Vec<String>>;
}

/// Convenience trait for backends that serve both roles
pub trait Backend: ConversationBackend + ThreadRegistry {}

impl<T: ConversationBackend + ThreadRegistry> Backend for T {}
