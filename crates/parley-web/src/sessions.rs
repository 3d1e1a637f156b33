use parley_session::SessionState;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// One browser session; the mutex serializes its interactions
pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Default)]
struct Sessions {
    by_id: HashMap<String, SessionHandle>,
    created: VecDeque<String>,
}

/// In-process registry of live sessions, keyed by session id
///
/// Holds at most `capacity` sessions; creating one more drops the oldest.
pub struct SessionStore {
    inner: RwLock<Sessions>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// Register a session and return its id
    pub async fn insert(&self, state: SessionState) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.inner.write().await;

        while sessions.by_id.len() >= self.capacity {
            let Some(oldest) = sessions.created.pop_front() else {
                break;
            };
            sessions.by_id.remove(&oldest);
            tracing::debug!(session_id = %oldest, "Evicted oldest session");
        }

        sessions
            .by_id
            .insert(session_id.clone(), Arc::new(Mutex::new(state)));
        sessions.created.push_back(session_id.clone());
        session_id
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.inner.read().await.by_id.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::Theme;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SessionStore::new(10);
        let id = store.insert(SessionState::new(vec![], Theme::Dark)).await;

        assert!(store.get(&id).await.is_some());
        assert!(store.get("unknown").await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let store = SessionStore::new(2);
        let first = store.insert(SessionState::new(vec![], Theme::Dark)).await;
        let second = store.insert(SessionState::new(vec![], Theme::Dark)).await;
        let third = store.insert(SessionState::new(vec![], Theme::Dark)).await;

        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
        assert!(store.get(&third).await.is_some());
        assert_eq!(store.len().await, 2);
    }
}
