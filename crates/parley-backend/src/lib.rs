pub mod error;
pub mod http;
pub mod memory;
pub mod sse;
pub mod traits;

pub use error::{BackendError, Result};
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, Responder};
pub use sse::{parse_sse_stream, CircularLineBuffer};
pub use traits::{Backend, ChunkStream, ConversationBackend, ThreadRegistry};
