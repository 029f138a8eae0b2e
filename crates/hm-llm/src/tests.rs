//! Unit tests for hm-llm.

use std::time::Duration;

use crate::error::CompletionResult;
use crate::{CompletionRequest, TextCompletionService};

fn request() -> CompletionRequest {
    CompletionRequest::new("classify", "weather: sunny")
}

/// Answers after `delay`; used to exercise the timeout path.
struct SlowService {
    delay: Duration,
}

impl TextCompletionService for SlowService {
    async fn complete(&self, _request: &CompletionRequest) -> CompletionResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok("Normal".to_owned())
    }
}

// ── Decoders ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decode_tests {
    use hm_core::{AoiId, Phase};

    use crate::decode::parse_reply;
    use crate::{DecodeError, decode_destination, decode_phase};

    #[test]
    fn phase_tokens_with_whitespace() {
        assert_eq!(decode_phase("During_Hurricane").unwrap(), Phase::During);
        assert_eq!(decode_phase("  After_Hurricane\n").unwrap(), Phase::After);
    }

    #[test]
    fn phase_rejects_anything_else() {
        assert!(matches!(decode_phase("normal"), Err(DecodeError::UnknownPhase(_))));
        assert!(matches!(
            decode_phase("The answer is Normal"),
            Err(DecodeError::UnknownPhase(_))
        ));
        assert!(decode_phase("").is_err());
    }

    #[test]
    fn destination_accepts_presented_candidate() {
        let candidates = [AoiId(11), AoiId(12)];
        let raw = r#"Sure! {"reason": "close by", "aoi_id": 12} hope that helps"#;
        assert_eq!(decode_destination(raw, &candidates).unwrap(), AoiId(12));
    }

    #[test]
    fn destination_rejects_unknown_candidate() {
        let raw = r#"{"reason": "x", "aoi_id": 99}"#;
        assert!(matches!(
            decode_destination(raw, &[AoiId(11)]),
            Err(DecodeError::NotACandidate(AoiId(99)))
        ));
    }

    #[test]
    fn destination_rejects_non_positive_id() {
        let raw = r#"{"aoi_id": 0}"#;
        assert!(matches!(decode_destination(raw, &[AoiId(11)]), Err(DecodeError::InvalidId(0))));
        let raw = r#"{"aoi_id": -4}"#;
        assert!(matches!(decode_destination(raw, &[AoiId(11)]), Err(DecodeError::InvalidId(-4))));
    }

    #[test]
    fn destination_rejects_non_integer_id() {
        let raw = r#"{"reason": "x", "aoi_id": "11"}"#;
        assert!(matches!(decode_destination(raw, &[AoiId(11)]), Err(DecodeError::Json(_))));
    }

    #[test]
    fn destination_without_object() {
        assert!(matches!(decode_destination("AOI 11", &[AoiId(11)]), Err(DecodeError::NoJsonObject)));
        assert!(matches!(decode_destination("} {", &[AoiId(11)]), Err(DecodeError::NoJsonObject)));
    }

    #[test]
    fn reason_is_optional() {
        let reply = parse_reply(r#"{"aoi_id": 5}"#).unwrap();
        assert_eq!(reply.reason, None);
        assert_eq!(reply.aoi_id, 5);
    }
}

// ── ScriptedCompletion ────────────────────────────────────────────────────────

#[cfg(test)]
mod scripted_tests {
    use super::*;
    use crate::{CompletionError, ScriptedCompletion};

    #[tokio::test]
    async fn queue_then_fallback() {
        let service = ScriptedCompletion::always("Normal")
            .then_reply("After_Hurricane")
            .then_fail("boom");
        assert_eq!(service.complete(&request()).await.unwrap(), "After_Hurricane");
        assert!(matches!(service.complete(&request()).await, Err(CompletionError::Service(_))));
        assert_eq!(service.complete(&request()).await.unwrap(), "Normal");
        assert_eq!(service.request_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_without_fallback_fails() {
        let service = ScriptedCompletion::new();
        assert!(service.complete(&request()).await.is_err());
        assert_eq!(service.requests()[0], request());
    }
}

// ── CallPolicy ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use hm_core::Phase;

    use super::*;
    use crate::{CallPolicy, CompletionError, ScriptedCompletion, decode_phase};

    #[tokio::test]
    async fn first_attempt_success() {
        let service = ScriptedCompletion::always("During_Hurricane");
        let policy = CallPolicy::default();
        let phase = policy.call(&service, &request(), "test", decode_phase).await.unwrap();
        assert_eq!(phase, Phase::During);
        assert_eq!(service.request_count(), 1);
    }

    #[tokio::test]
    async fn retries_after_service_failure() {
        let service = ScriptedCompletion::always("Normal").then_fail("connection reset");
        let policy = CallPolicy { timeout_ms: 1_000, max_attempts: 2 };
        let phase = policy.call(&service, &request(), "test", decode_phase).await.unwrap();
        assert_eq!(phase, Phase::Normal);
        assert_eq!(service.request_count(), 2);
    }

    #[tokio::test]
    async fn malformed_reply_consumes_an_attempt() {
        let service = ScriptedCompletion::always("Normal").then_reply("sunny, probably");
        let policy = CallPolicy { timeout_ms: 1_000, max_attempts: 2 };
        assert!(policy.call(&service, &request(), "test", decode_phase).await.is_ok());
        assert_eq!(service.request_count(), 2);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let service = ScriptedCompletion::always("not a phase");
        let policy = CallPolicy { timeout_ms: 1_000, max_attempts: 3 };
        let result = policy.call(&service, &request(), "test", decode_phase).await;
        assert!(matches!(result, Err(CompletionError::Decode(_))));
        assert_eq!(service.request_count(), 3);
    }

    #[tokio::test]
    async fn zero_attempts_means_one() {
        let service = ScriptedCompletion::new();
        let policy = CallPolicy { timeout_ms: 1_000, max_attempts: 0 };
        assert!(policy.call(&service, &request(), "test", decode_phase).await.is_err());
        assert_eq!(service.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_service_times_out() {
        let service = SlowService { delay: Duration::from_secs(30) };
        let policy = CallPolicy { timeout_ms: 50, max_attempts: 2 };
        let result = policy.call(&service, &request(), "test", decode_phase).await;
        assert!(matches!(result, Err(CompletionError::Timeout { after_ms: 50 })));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_enough_service_succeeds() {
        let service = SlowService { delay: Duration::from_millis(10) };
        let policy = CallPolicy { timeout_ms: 500, max_attempts: 1 };
        let phase = policy.call(&service, &request(), "test", decode_phase).await.unwrap();
        assert_eq!(phase, Phase::Normal);
    }

    #[test]
    fn policy_from_json() {
        let policy: CallPolicy = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(policy, CallPolicy { timeout_ms: 2_500, max_attempts: 3 });
    }
}
