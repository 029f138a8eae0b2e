//! Fallible decode steps for the two response contracts.
//!
//! * classifier — the trimmed text must be exactly one phase token;
//! * destination assist — a JSON object `{"reason": .., "aoi_id": <int>}`
//!   whose id is one of the candidates shown in the prompt.
//!
//! Each returns either a validated value or a typed [`DecodeError`]; the
//! fallback policy is the caller's business.

use hm_core::{AoiId, Phase};
use serde::Deserialize;

use crate::DecodeError;

/// Shape of the destination-assist reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DestinationReply {
    #[serde(default)]
    pub reason: Option<String>,
    pub aoi_id: i64,
}

/// Decode a classifier reply into a [`Phase`].
pub fn decode_phase(raw: &str) -> Result<Phase, DecodeError> {
    let trimmed = raw.trim();
    Phase::from_token(trimmed).ok_or_else(|| DecodeError::UnknownPhase(trimmed.to_owned()))
}

/// Decode a destination-assist reply and check it against `candidates`.
///
/// Text around the JSON object (markdown fences, chatter) is ignored.
pub fn decode_destination(raw: &str, candidates: &[AoiId]) -> Result<AoiId, DecodeError> {
    let reply = parse_reply(raw)?;
    let id = AoiId::from_raw(reply.aoi_id).ok_or(DecodeError::InvalidId(reply.aoi_id))?;
    if candidates.contains(&id) {
        Ok(id)
    } else {
        Err(DecodeError::NotACandidate(id))
    }
}

/// Parse the outermost `{ .. }` span of `raw` as a [`DestinationReply`].
pub fn parse_reply(raw: &str) -> Result<DestinationReply, DecodeError> {
    let start = raw.find('{').ok_or(DecodeError::NoJsonObject)?;
    let end = raw.rfind('}').filter(|&end| end > start).ok_or(DecodeError::NoJsonObject)?;
    Ok(serde_json::from_str(&raw[start..=end])?)
}
