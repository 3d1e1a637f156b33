pub mod config;
pub mod content;
pub mod message;
pub mod record;
pub mod state;
pub mod theme;

pub use config::{Configurable, RunConfig, StreamMode, CHAT_TURN_RUN_NAME};
pub use content::{Content, ContentPart};
pub use message::Message;
pub use record::{ChatRecord, Role};
pub use state::{GraphInput, MessageChunk, StateValues, ThreadState};
pub use theme::{Theme, UnknownTheme};

/// Produce a fresh globally-unique thread identifier (UUID v4)
pub fn generate_thread_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
