use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use parley_backend::BackendError;
use parley_session::SessionError;
use serde_json::json;
use thiserror::Error;

use crate::render::page;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Reply stream was interrupted")]
    Interrupted,
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Backend(e) => ApiError::Backend(e),
            SessionError::EmptyMessage => ApiError::BadRequest("message is empty".to_string()),
            SessionError::UnknownThread(id) => ApiError::ThreadNotFound(id),
            SessionError::Interrupted => ApiError::Interrupted,
        }
    }
}

impl ApiError {
    /// Status and the message safe to show a client
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::SessionNotFound(_) | ApiError::ThreadNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Backend(e) => {
                tracing::error!("Backend error: {}", e);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::Interrupted => {
                tracing::error!("Reply stream interrupted");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Same failures, shown to a browser as an error page
#[derive(Debug)]
pub struct PageError(pub ApiError);

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        PageError(err)
    }
}

impl From<SessionError> for PageError {
    fn from(err: SessionError) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        (status, Html(page::error_page(status, &message))).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_status() {
        let cases = [
            (SessionError::EmptyMessage, StatusCode::BAD_REQUEST),
            (SessionError::UnknownThread("t".into()), StatusCode::NOT_FOUND),
            (SessionError::Interrupted, StatusCode::BAD_GATEWAY),
            (
                SessionError::Backend(BackendError::Stream("gone".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_page_error_is_html() {
        let response = PageError(ApiError::SessionNotFound("s".into())).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
