use hm_core::AoiId;
use thiserror::Error;

/// Why a raw completion could not be turned into a validated value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response {0:?} is not one of the phase tokens")]
    UnknownPhase(String),

    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("malformed JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("aoi_id {0} is not a valid AOI id")]
    InvalidId(i64),

    #[error("{0} was not among the presented candidates")]
    NotACandidate(AoiId),
}

/// Failure of one bounded call to the text-completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("text completion timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("text completion service failed: {0}")]
    Service(String),

    #[error("unusable completion: {0}")]
    Decode(#[from] DecodeError),
}

pub type CompletionResult<T> = Result<T, CompletionError>;
