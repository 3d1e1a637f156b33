use parley_backend::{Backend, ConversationBackend, ThreadRegistry};
use parley_types::{ChatRecord, GraphInput, RunConfig, StreamMode, Theme};
use std::sync::Arc;

use crate::error::{Result, SessionError};
use crate::reply::ReplyStream;
use crate::state::SessionState;

/// Translates user actions into backend calls and session-state changes
///
/// The coordinator itself is stateless and shared; every operation takes
/// the session it acts on explicitly.
#[derive(Clone)]
pub struct Coordinator {
    backend: Arc<dyn Backend>,
    default_theme: Theme,
}

impl Coordinator {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            default_theme: Theme::default(),
        }
    }

    pub fn with_default_theme(mut self, theme: Theme) -> Self {
        self.default_theme = theme;
        self
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Build the state of a new session from the backend's thread registry
    pub async fn start_session(&self) -> Result<SessionState> {
        let known = self.backend.retrieve_all_threads().await?;
        let state = SessionState::new(known, self.default_theme);
        tracing::info!(
            thread_id = %state.thread_id(),
            known_threads = state.chat_threads().len() - 1,
            "Session started"
        );
        Ok(state)
    }

    /// Stored conversation of a thread, as display records in stored order
    pub async fn load_conversation(&self, thread_id: &str) -> Result<Vec<ChatRecord>> {
        let state = self
            .backend
            .get_state(&RunConfig::for_thread(thread_id))
            .await?;
        Ok(state.messages().iter().map(ChatRecord::from).collect())
    }

    /// "New Chat": start and activate a fresh thread
    pub fn new_chat(&self, state: &mut SessionState) -> String {
        let thread_id = state.reset_chat().to_string();
        tracing::info!(thread_id = %thread_id, "New chat thread");
        thread_id
    }

    /// Activate a known thread, replacing the displayed history with the
    /// backend's copy
    ///
    /// The history is fetched before anything changes, so a failed lookup
    /// leaves the session as it was.
    pub async fn select_thread(&self, state: &mut SessionState, thread_id: &str) -> Result<()> {
        if !state.contains_thread(thread_id) {
            return Err(SessionError::UnknownThread(thread_id.to_string()));
        }

        let history = self.load_conversation(thread_id).await?;
        tracing::info!(thread_id = %thread_id, messages = history.len(), "Thread selected");
        state.switch_to(thread_id, history)
    }

    /// Forget a thread; deleting the active one starts a new chat
    pub fn delete_thread(&self, state: &mut SessionState, thread_id: &str) -> Result<()> {
        let was_active = state.remove_thread(thread_id)?;
        tracing::info!(thread_id = %thread_id, was_active, "Thread deleted");
        Ok(())
    }

    /// Record the user's message and start streaming the reply
    ///
    /// The title (if still default) and the user record are applied before
    /// the backend is called and stay in place if the call fails.
    pub async fn begin_turn(&self, state: &mut SessionState, input: &str) -> Result<ReplyStream> {
        if input.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        state.title_from_first_message(input);
        state.push_record(ChatRecord::user(input));

        let thread_id = state.thread_id().to_string();
        let chunks = self
            .backend
            .stream(
                GraphInput::human(input),
                RunConfig::chat_turn(thread_id.clone()),
                StreamMode::Messages,
            )
            .await
            .map_err(|e| {
                tracing::error!(thread_id = %thread_id, error = %e, "Backend refused chat turn");
                e
            })?;

        Ok(ReplyStream::new(thread_id, chunks))
    }

    /// Full send: record input, stream the reply through `on_fragment`,
    /// append the completed assistant record
    pub async fn send_message<F>(
        &self,
        state: &mut SessionState,
        input: &str,
        on_fragment: F,
    ) -> Result<ChatRecord>
    where
        F: FnMut(&str),
    {
        let mut reply = self.begin_turn(state, input).await?;
        reply.for_each_fragment(on_fragment).await?;
        reply.finish(state)
    }
}
