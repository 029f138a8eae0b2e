//! One bounded call policy shared by every call site.
//!
//! Each attempt is wrapped in `tokio::time::timeout`.  An attempt fails on
//! timeout, on a service error, or when the response does not decode; the
//! next attempt is made until `max_attempts` is reached.  The last error is
//! then returned so the caller can log it and fall back.

use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use crate::error::CompletionResult;
use crate::{CompletionError, CompletionRequest, DecodeError, TextCompletionService};

/// Timeout and retry bounds for text-completion calls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CallPolicy {
    /// Deadline for a single attempt, in milliseconds.
    pub timeout_ms: u64,
    /// Total attempts per call, including the first.  Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self { timeout_ms: 2_500, max_attempts: 2 }
    }
}

impl CallPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Call `service` and decode the reply, retrying within the policy bounds.
    ///
    /// `site` names the call site in debug logs.
    pub async fn call<S, T, F>(
        &self,
        service: &S,
        request: &CompletionRequest,
        site:    &'static str,
        decode:  F,
    ) -> CompletionResult<T>
    where
        S: TextCompletionService,
        F: Fn(&str) -> Result<T, DecodeError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(service, request, &decode).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    debug!(site, attempt, error = %e, "text completion attempt failed, retrying");
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt<S, T, F>(
        &self,
        service: &S,
        request: &CompletionRequest,
        decode:  &F,
    ) -> CompletionResult<T>
    where
        S: TextCompletionService,
        F: Fn(&str) -> Result<T, DecodeError>,
    {
        match timeout(self.timeout(), service.complete(request)).await {
            Err(_elapsed) => Err(CompletionError::Timeout { after_ms: self.timeout_ms }),
            Ok(Err(e))    => Err(e),
            Ok(Ok(raw))   => decode(&raw).map_err(CompletionError::from),
        }
    }
}
