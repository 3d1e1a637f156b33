use async_trait::async_trait;
use parley_types::{GraphInput, RunConfig, StreamMode, ThreadState};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{BackendError, Result};
use crate::sse::parse_sse_stream;
use crate::traits::{ChunkStream, ConversationBackend, ThreadRegistry};

#[derive(Debug, Serialize)]
struct StreamRequest<'a> {
    input: &'a GraphInput,
    config: &'a RunConfig,
    stream_mode: StreamMode,
}

#[derive(Debug, Deserialize)]
struct ThreadListResponse {
    #[serde(default)]
    threads: Vec<String>,
}

/// Backend reached over HTTP, replies streamed as Server-Sent Events
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    api_key: Option<String>,
}

impl HttpBackend {
    /// `request_timeout` bounds state and registry calls; streamed replies
    /// are only bounded by the connect timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
            api_key: None,
        })
    }

    /// Send `key` as `x-api-key` on every request
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ConversationBackend for HttpBackend {
    async fn get_state(&self, config: &RunConfig) -> Result<ThreadState> {
        let url = self.endpoint(&["threads", config.thread_id(), "state"])?;
        tracing::debug!(thread_id = %config.thread_id(), "Fetching thread state");

        let request = self.client.post(url).timeout(self.request_timeout).json(config);
        let response = self.authorize(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ThreadState::default());
        }

        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn stream(
        &self,
        input: GraphInput,
        config: RunConfig,
        mode: StreamMode,
    ) -> Result<ChunkStream> {
        let url = self.endpoint(&["threads", config.thread_id(), "stream"])?;
        tracing::debug!(thread_id = %config.thread_id(), mode = mode.as_str(), "Starting backend stream");

        let request = StreamRequest {
            input: &input,
            config: &config,
            stream_mode: mode,
        };

        let request = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request);
        let response = self.authorize(request).send().await?;

        let response = Self::check_status(response).await?;
        Ok(parse_sse_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl ThreadRegistry for HttpBackend {
    async fn retrieve_all_threads(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["threads"])?;

        let request = self.client.get(url).timeout(self.request_timeout);
        let response = self.authorize(request).send().await?;

        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        let list: ThreadListResponse = serde_json::from_slice(&body)?;
        Ok(list.threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let backend = HttpBackend::new("http://localhost:2024/api/", Duration::from_secs(1)).unwrap();
        let url = backend.endpoint(&["threads", "a b", "state"]).unwrap();

        assert_eq!(url.as_str(), "http://localhost:2024/api/threads/a%20b/state");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpBackend::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }
}
