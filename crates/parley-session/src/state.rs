use parley_types::{generate_thread_id, ChatRecord, Theme};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{Result, SessionError};
use crate::title::ThreadTitle;

/// Everything one browser session remembers between interactions
///
/// Invariants kept by every mutating method:
/// - `thread_id` is always in `chat_threads`
/// - every thread in `chat_threads` has an entry in `thread_titles`
/// - `message_history` belongs to `thread_id` only
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    thread_id: String,
    chat_threads: Vec<String>,
    thread_titles: HashMap<String, ThreadTitle>,
    message_history: Vec<ChatRecord>,
    theme: Theme,
}

impl SessionState {
    /// Fresh session seeded with threads the backend already knows
    ///
    /// Seeded threads are titled with their own id. A new untitled thread is
    /// created and made active.
    pub fn new(known_threads: Vec<String>, theme: Theme) -> Self {
        let mut state = Self {
            thread_id: String::new(),
            chat_threads: Vec::with_capacity(known_threads.len() + 1),
            thread_titles: HashMap::new(),
            message_history: Vec::new(),
            theme,
        };

        for thread_id in known_threads {
            state.add_thread(&thread_id);
        }

        state.reset_chat();
        state
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Known threads in creation order
    pub fn chat_threads(&self) -> &[String] {
        &self.chat_threads
    }

    /// Known threads as the sidebar lists them
    pub fn threads_newest_first(&self) -> impl Iterator<Item = &str> {
        self.chat_threads.iter().rev().map(String::as_str)
    }

    pub fn message_history(&self) -> &[ChatRecord] {
        &self.message_history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn contains_thread(&self, thread_id: &str) -> bool {
        self.chat_threads.iter().any(|t| t == thread_id)
    }

    pub fn title(&self, thread_id: &str) -> Option<&ThreadTitle> {
        self.thread_titles.get(thread_id)
    }

    /// Sidebar label, falling back to the id itself
    pub fn display_title<'a>(&'a self, thread_id: &'a str) -> &'a str {
        self.thread_titles
            .get(thread_id)
            .map(ThreadTitle::as_str)
            .unwrap_or(thread_id)
    }

    /// Start a new untitled thread, make it active and clear the log
    pub fn reset_chat(&mut self) -> &str {
        let thread_id = generate_thread_id();
        self.add_thread(&thread_id);
        self.thread_titles
            .insert(thread_id.clone(), ThreadTitle::Untitled);
        self.message_history.clear();
        self.thread_id = thread_id;
        &self.thread_id
    }

    /// Append `thread_id` to the known threads unless already present
    ///
    /// A thread without a title yet is titled with its own id.
    pub fn add_thread(&mut self, thread_id: &str) {
        if !self.contains_thread(thread_id) {
            self.chat_threads.push(thread_id.to_string());
        }
        self.thread_titles
            .entry(thread_id.to_string())
            .or_insert_with(|| ThreadTitle::Named(thread_id.to_string()));
    }

    /// Make `thread_id` active with the given history, replacing the old log
    pub fn switch_to(&mut self, thread_id: &str, history: Vec<ChatRecord>) -> Result<()> {
        if !self.contains_thread(thread_id) {
            return Err(SessionError::UnknownThread(thread_id.to_string()));
        }
        self.thread_id = thread_id.to_string();
        self.message_history = history;
        Ok(())
    }

    /// Forget a thread; returns whether it was the active one
    ///
    /// Removing the active thread starts a new one in its place.
    pub fn remove_thread(&mut self, thread_id: &str) -> Result<bool> {
        let position = self
            .chat_threads
            .iter()
            .position(|t| t == thread_id)
            .ok_or_else(|| SessionError::UnknownThread(thread_id.to_string()))?;

        self.chat_threads.remove(position);
        self.thread_titles.remove(thread_id);

        let was_active = self.thread_id == thread_id;
        if was_active {
            self.reset_chat();
        }
        Ok(was_active)
    }

    /// Name the active thread after `message` if it is still untitled
    pub fn title_from_first_message(&mut self, message: &str) {
        let title = self
            .thread_titles
            .entry(self.thread_id.clone())
            .or_insert(ThreadTitle::Untitled);
        if title.is_default() {
            *title = ThreadTitle::from_first_message(message);
        }
    }

    pub fn push_record(&mut self, record: ChatRecord) {
        self.message_history.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::DEFAULT_TITLE;

    fn assert_invariants(state: &SessionState) {
        assert!(state.contains_thread(state.thread_id()));
        for thread in state.chat_threads() {
            assert!(state.title(thread).is_some(), "missing title for {thread}");
        }
    }

    #[test]
    fn test_new_session_seeds_and_creates_active_thread() {
        let state = SessionState::new(vec!["t1".to_string()], Theme::Dark);

        assert_eq!(state.chat_threads().len(), 2);
        assert_eq!(state.chat_threads()[0], "t1");
        assert_eq!(state.chat_threads()[1], state.thread_id());
        assert_eq!(state.display_title(state.thread_id()), DEFAULT_TITLE);
        assert_eq!(state.display_title("t1"), "t1");
        assert!(state.message_history().is_empty());
        assert_invariants(&state);
    }

    #[test]
    fn test_seed_duplicates_collapse() {
        let state = SessionState::new(vec!["a".into(), "a".into()], Theme::Dark);
        assert_eq!(state.chat_threads().iter().filter(|t| *t == "a").count(), 1);
    }

    #[test]
    fn test_add_thread_is_idempotent() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        state.add_thread("x");
        state.add_thread("x");
        assert_eq!(state.chat_threads().len(), 2);
        assert_invariants(&state);
    }

    #[test]
    fn test_added_thread_keeps_existing_title() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        let active = state.thread_id().to_string();

        state.add_thread("x");
        state.add_thread(&active);

        assert_eq!(state.display_title("x"), "x");
        assert_eq!(state.display_title(&active), DEFAULT_TITLE);
        assert_invariants(&state);
    }

    #[test]
    fn test_reset_chat_produces_fresh_ids() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        let mut seen = vec![state.thread_id().to_string()];

        for _ in 0..20 {
            let id = state.reset_chat().to_string();
            assert!(!seen.contains(&id));
            seen.push(id);
        }

        assert_eq!(state.chat_threads(), seen.as_slice());
        assert_invariants(&state);
    }

    #[test]
    fn test_remove_non_active_keeps_active_state() {
        let mut state = SessionState::new(vec!["old".to_string()], Theme::Dark);
        state.push_record(ChatRecord::user("hi"));
        let active = state.thread_id().to_string();

        assert!(!state.remove_thread("old").unwrap());

        assert_eq!(state.thread_id(), active);
        assert_eq!(state.message_history(), &[ChatRecord::user("hi")]);
        assert!(!state.contains_thread("old"));
        assert!(state.title("old").is_none());
    }

    #[test]
    fn test_remove_active_starts_new_thread() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        state.title_from_first_message("something");
        state.push_record(ChatRecord::user("something"));
        let active = state.thread_id().to_string();

        assert!(state.remove_thread(&active).unwrap());

        assert_ne!(state.thread_id(), active);
        assert!(state.message_history().is_empty());
        assert_eq!(state.display_title(state.thread_id()), DEFAULT_TITLE);
        assert_invariants(&state);
    }

    #[test]
    fn test_remove_unknown_thread() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        assert!(matches!(
            state.remove_thread("ghost"),
            Err(SessionError::UnknownThread(_))
        ));
    }

    #[test]
    fn test_title_set_once() {
        let mut state = SessionState::new(vec![], Theme::Dark);

        state.title_from_first_message("first message");
        state.title_from_first_message("second message");

        assert_eq!(state.display_title(state.thread_id()), "first message");
    }

    #[test]
    fn test_switch_to_unknown_thread_leaves_state() {
        let mut state = SessionState::new(vec![], Theme::Dark);
        let active = state.thread_id().to_string();

        assert!(state.switch_to("ghost", vec![]).is_err());
        assert_eq!(state.thread_id(), active);
    }

    #[test]
    fn test_newest_first() {
        let state = SessionState::new(vec!["a".into(), "b".into()], Theme::Light);
        let order: Vec<&str> = state.threads_newest_first().collect();

        assert_eq!(order[1..], ["b", "a"]);
        assert_eq!(order[0], state.thread_id());
        assert_eq!(state.theme(), Theme::Light);
    }
}
