use parley_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Thread not found: {0}")]
    UnknownThread(String),

    #[error("Reply stream was interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, SessionError>;
