pub mod coordinator;
pub mod error;
pub mod render;
pub mod reply;
pub mod state;
pub mod title;

pub use coordinator::Coordinator;
pub use error::{Result, SessionError};
pub use render::{RenderModel, ThreadEntry};
pub use reply::{ReplyAccumulator, ReplyStream};
pub use state::SessionState;
pub use title::{ThreadTitle, DEFAULT_TITLE, TITLE_MAX_CHARS};
