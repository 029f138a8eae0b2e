//! The `TextCompletionService` capability and an in-process scripted double.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use crate::error::CompletionResult;
use crate::{CompletionError, CompletionRequest};

/// An external service that turns a prompt into raw text.
///
/// Many agents may call the same service concurrently within one tick, so
/// implementations must be `Send + Sync` and safe to re-enter.  The engine
/// never assumes anything about the returned text; decoding is done by the
/// caller through [`CallPolicy::call`][crate::CallPolicy::call].
///
/// Implementations may write `async fn complete(..)` directly.
pub trait TextCompletionService: Send + Sync {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = CompletionResult<String>> + Send;
}

// ── ScriptedCompletion ────────────────────────────────────────────────────────

/// A service answering from a fixed script, for tests and offline runs.
///
/// Queued replies are consumed in order; once the queue is empty every call
/// gets the fallback reply (or a service error when no fallback is set).
/// All requests are recorded for later inspection.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies:  Mutex<VecDeque<CompletionResult<String>>>,
    fallback: Option<String>,
    seen:     Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that always answers `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self { fallback: Some(reply.into()), ..Self::default() }
    }

    /// Queue one successful reply.
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue one service failure.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Err(CompletionError::Service(message.into())));
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    fn push(&self, reply: CompletionResult<String>) {
        if let Ok(mut queue) = self.replies.lock() {
            queue.push_back(reply);
        }
    }

    fn next_reply(&self) -> CompletionResult<String> {
        let queued = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        match (queued, &self.fallback) {
            (Some(reply), _)     => reply,
            (None, Some(reply))  => Ok(reply.clone()),
            (None, None)         => Err(CompletionError::Service("script exhausted".into())),
        }
    }
}

impl TextCompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.next_reply()
    }
}
