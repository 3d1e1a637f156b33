use parley_types::{ChatRecord, Theme};
use serde::Serialize;

use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadEntry {
    pub thread_id: String,
    pub title: String,
    pub active: bool,
}

/// Everything one render pass draws, recomputed from state on every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub active_thread_id: String,
    /// Sidebar entries, newest first
    pub threads: Vec<ThreadEntry>,
    pub messages: Vec<ChatRecord>,
    pub theme: Theme,
}

impl From<&SessionState> for RenderModel {
    fn from(state: &SessionState) -> Self {
        let threads = state
            .threads_newest_first()
            .map(|thread_id| ThreadEntry {
                thread_id: thread_id.to_string(),
                title: state.display_title(thread_id).to_string(),
                active: thread_id == state.thread_id(),
            })
            .collect();

        Self {
            active_thread_id: state.thread_id().to_string(),
            threads,
            messages: state.message_history().to_vec(),
            theme: state.theme(),
        }
    }
}

impl SessionState {
    pub fn render(&self) -> RenderModel {
        RenderModel::from(self)
    }
}
