use futures::{Stream, StreamExt};
use parley_types::MessageChunk;
use std::collections::VecDeque;
use std::fmt::Display;

use crate::error::{BackendError, Result};
use crate::traits::ChunkStream;

/// Circular buffer for line-based parsing of a byte stream
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next line (up to \n) from buffer, trimmed
    ///
    /// Returns None if no complete line is available yet.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        match std::str::from_utf8(&line_bytes) {
            Ok(line_str) => Some(Ok(line_str.trim().to_string())),
            Err(e) => Some(Err(BackendError::Utf8(e))),
        }
    }

    /// Whatever is left once the byte stream has ended
    pub fn take_remainder(&mut self) -> Option<Result<String>> {
        if self.buffer.is_empty() {
            return None;
        }
        let bytes: Vec<u8> = self.buffer.drain(..).collect();
        match std::str::from_utf8(&bytes) {
            Ok(s) => Some(Ok(s.trim().to_string())),
            Err(e) => Some(Err(BackendError::Utf8(e))),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Outcome of feeding one SSE line to the frame parser
#[derive(Debug, PartialEq)]
pub enum SseLine {
    Chunk(MessageChunk),
    Done,
    Failed(String),
    Skip,
}

/// Tracks the `event:` field of the frame being read
#[derive(Debug, Default)]
pub struct SseFrameParser {
    event: Option<String>,
}

impl SseFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_line(&mut self, line: &str) -> Result<SseLine> {
        if line.is_empty() {
            // Blank line ends the frame
            self.event = None;
            return Ok(SseLine::Skip);
        }

        if let Some(event) = line.strip_prefix("event:") {
            self.event = Some(event.trim().to_string());
            return Ok(SseLine::Skip);
        }

        let Some(data) = line.strip_prefix("data:") else {
            // Comments, ids and retry hints
            return Ok(SseLine::Skip);
        };
        let data = data.trim();

        if data.is_empty() {
            // Keep-alive
            return Ok(SseLine::Skip);
        }

        if data == "[DONE]" {
            return Ok(SseLine::Done);
        }

        match self.event.as_deref() {
            Some("error") => Ok(SseLine::Failed(error_message(data))),
            Some("end") => Ok(SseLine::Done),
            _ => Ok(decode_chunk(data)?
                .filter(|chunk| !chunk.content.is_empty())
                .map(SseLine::Chunk)
                .unwrap_or(SseLine::Skip)),
        }
    }
}

/// Decode a `data:` payload into a message chunk
///
/// Accepts either `{"content", "metadata"}` or the `[chunk, metadata]` pair
/// graph servers emit in `messages` stream mode.
pub fn decode_chunk(data: &str) -> Result<Option<MessageChunk>> {
    let value: serde_json::Value = serde_json::from_str(data)?;

    let chunk = match value {
        serde_json::Value::Array(mut pair) if !pair.is_empty() => {
            let metadata = if pair.len() > 1 {
                serde_json::from_value(pair.remove(1)).unwrap_or_default()
            } else {
                Default::default()
            };
            let content = content_text(&pair[0]);
            content.map(|content| MessageChunk { content, metadata })
        }
        serde_json::Value::Object(_) => {
            let metadata = value
                .get("metadata")
                .cloned()
                .and_then(|m| serde_json::from_value(m).ok())
                .unwrap_or_default();
            content_text(&value).map(|content| MessageChunk { content, metadata })
        }
        _ => None,
    };

    Ok(chunk)
}

fn content_text(chunk: &serde_json::Value) -> Option<String> {
    let content = chunk.get("content")?;
    serde_json::from_value::<parley_types::Content>(content.clone())
        .ok()
        .map(|c| c.to_text())
}

fn error_message(data: &str) -> String {
    serde_json::from_str::<serde_json::Value>(data)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| data.to_string())
}

/// Turn a raw SSE byte stream into reply fragments
pub fn parse_sse_stream<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(bytes);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut parser = SseFrameParser::new();
        let mut finished = false;

        'outer: while let Some(chunk_result) = byte_chunks.next().await {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(BackendError::Stream(e.to_string()));
                    finished = true;
                    break;
                }
            };
            buffer.extend(bytes.as_ref());

            while let Some(line_result) = buffer.next_line() {
                match line_result.and_then(|line| parser.parse_line(&line)) {
                    Ok(SseLine::Chunk(chunk)) => yield Ok(chunk),
                    Ok(SseLine::Done) => {
                        finished = true;
                        break 'outer;
                    }
                    Ok(SseLine::Failed(message)) => {
                        yield Err(BackendError::Stream(message));
                        finished = true;
                        break 'outer;
                    }
                    Ok(SseLine::Skip) => {}
                    Err(e) => {
                        yield Err(e);
                        finished = true;
                        break 'outer;
                    }
                }
            }
        }

        // A final line without trailing newline
        if !finished {
            if let Some(line_result) = buffer.take_remainder() {
                match line_result.and_then(|line| parser.parse_line(&line)) {
                    Ok(SseLine::Chunk(chunk)) => yield Ok(chunk),
                    Ok(SseLine::Failed(message)) => yield Err(BackendError::Stream(message)),
                    Ok(_) => {}
                    Err(e) => yield Err(e),
                }
            }
        }
    })
}
