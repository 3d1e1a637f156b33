use parley_session::Coordinator;

use crate::config::Config;
use crate::sessions::SessionStore;

/// Shared application state passed to all handlers
///
/// The coordinator is stateless; per-user state lives in the session store.
pub struct AppState {
    pub config: Config,
    pub coordinator: Coordinator,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, coordinator: Coordinator) -> Self {
        let sessions = SessionStore::new(config.server.max_sessions);
        Self {
            config,
            coordinator,
            sessions,
        }
    }
}
