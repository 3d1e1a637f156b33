use futures::StreamExt;
use parley_backend::ChunkStream;
use parley_types::ChatRecord;
use std::time::Instant;

use crate::error::{Result, SessionError};
use crate::state::SessionState;

/// Accumulates streamed fragments into the final assistant message
#[derive(Debug)]
pub struct ReplyAccumulator {
    buffer: String,
    fragments: usize,
    started_at: Instant,
    failed: bool,
}

impl Default for ReplyAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            fragments: 0,
            started_at: Instant::now(),
            failed: false,
        }
    }

    pub fn push(&mut self, fragment: &str) {
        self.buffer.push_str(fragment);
        self.fragments += 1;
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Completed reply, or `None` if the stream broke
    pub fn finalize(self) -> Option<String> {
        if self.failed {
            None
        } else {
            Some(self.buffer)
        }
    }
}

/// An in-flight assistant reply for one chat turn
///
/// Fragments are pulled with [`ReplyStream::next_fragment`]; once the
/// stream is exhausted, [`ReplyStream::finish`] appends the assistant record.
/// A broken stream never produces a record.
pub struct ReplyStream {
    thread_id: String,
    chunks: ChunkStream,
    reply: ReplyAccumulator,
    done: bool,
}

impl ReplyStream {
    pub(crate) fn new(thread_id: String, chunks: ChunkStream) -> Self {
        Self {
            thread_id,
            chunks,
            reply: ReplyAccumulator::new(),
            done: false,
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Next fragment of the reply, `None` once the stream has ended
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        if self.done {
            return None;
        }

        match self.chunks.next().await {
            Some(Ok(chunk)) => {
                self.reply.push(&chunk.content);
                Some(Ok(chunk.content))
            }
            Some(Err(e)) => {
                self.done = true;
                self.reply.mark_failed();
                tracing::warn!(
                    thread_id = %self.thread_id,
                    fragments = self.reply.fragments(),
                    error = %e,
                    "Reply stream interrupted, discarding partial reply"
                );
                Some(Err(SessionError::Backend(e)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    /// Drain the rest of the stream, calling `on_fragment` for each piece
    pub async fn for_each_fragment<F>(&mut self, mut on_fragment: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        while let Some(fragment) = self.next_fragment().await {
            on_fragment(&fragment?);
        }
        Ok(())
    }

    /// Append the completed reply to the session's history
    ///
    /// Fails with [`SessionError::Interrupted`] if the stream broke. If the
    /// session moved to another thread meanwhile, the record is returned but
    /// not appended.
    pub fn finish(mut self, state: &mut SessionState) -> Result<ChatRecord> {
        if !self.done && !self.reply.is_failed() {
            // Finishing early drops whatever the backend had not sent yet
            self.reply.mark_failed();
        }

        let fragments = self.reply.fragments();
        let elapsed_ms = self.reply.elapsed_ms();
        let text = self.reply.finalize().ok_or(SessionError::Interrupted)?;
        let record = ChatRecord::assistant(text);

        if state.thread_id() == self.thread_id {
            state.push_record(record.clone());
        } else {
            tracing::warn!(
                thread_id = %self.thread_id,
                active = %state.thread_id(),
                "Active thread changed during reply, record not appended"
            );
        }

        tracing::info!(
            thread_id = %self.thread_id,
            fragments,
            duration_ms = elapsed_ms,
            "Chat turn completed"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_concatenates() {
        let mut acc = ReplyAccumulator::new();
        acc.push("Hel");
        acc.push("lo");

        assert_eq!(acc.text(), "Hello");
        assert_eq!(acc.fragments(), 2);
        assert_eq!(acc.finalize().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_failed_accumulator_yields_nothing() {
        let mut acc = ReplyAccumulator::new();
        acc.push("partial");
        acc.mark_failed();

        assert!(acc.finalize().is_none());
    }
}
