//! A completion service that answers without any network access.
//!
//! Weather reports are classified by keyword.  Destination requests get the
//! first listed option back in the expected JSON shape.

use hm_llm::error::CompletionResult;
use hm_llm::{CompletionRequest, TextCompletionService};

const DURING: &[&str] = &["hurricane", "landfall", "storm surge", "tropical storm"];
const AFTER: &[&str] = &["passed", "recovery", "aftermath", "clean-up", "power restored"];

pub struct OfflineCompletion;

impl OfflineCompletion {
    fn classify(weather: &str) -> &'static str {
        let weather = weather.to_lowercase();
        if AFTER.iter().any(|k| weather.contains(k)) {
            "After_Hurricane"
        } else if DURING.iter().any(|k| weather.contains(k)) {
            "During_Hurricane"
        } else {
            "Normal"
        }
    }

    fn first_option(prompt: &str) -> Option<&str> {
        prompt
            .lines()
            .filter(|line| line.starts_with("- "))
            .find_map(|line| line.rsplit_once("AOI ").map(|(_, id)| id.trim()))
    }
}

impl TextCompletionService for OfflineCompletion {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        if let Some(weather) = request.user.strip_prefix("Weather: ") {
            let weather = weather.lines().next().unwrap_or_default();
            return Ok(Self::classify(weather).to_owned());
        }
        Ok(match Self::first_option(&request.user) {
            Some(id) => format!(r#"{{"reason": "first listed option", "aoi_id": {id}}}"#),
            None => "no options".to_owned(),
        })
    }
}
