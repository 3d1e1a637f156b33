use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid UTF-8 in stream: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Stream interrupted: {0}")]
    Stream(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;
