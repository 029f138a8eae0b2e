//! Weather → [`Phase`] classification with hourly hysteresis.

use hm_core::{Phase, SimTime};
use hm_llm::{CallPolicy, CompletionRequest, TextCompletionService, decode_phase};
use tracing::{info, warn};

use crate::ClassifierConfig;

const SYSTEM_PROMPT: &str = "You classify weather reports for a coastal city into exactly one regime:\n\
- Normal: ordinary weather\n\
- During_Hurricane: a hurricane is currently hitting the city\n\
- After_Hurricane: the hurricane has passed and the city is recovering\n\
Reply with the label only.";

/// A phase transition observed by [`ModeClassifier::refresh`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to:   Phase,
}

/// Holds an agent's current phase and when it was last classified.
#[derive(Clone, Debug, Default)]
pub struct ModeClassifier {
    phase:    Phase,
    last_run: Option<SimTime>,
}

impl ModeClassifier {
    pub fn new(initial: Phase) -> Self {
        Self { phase: initial, last_run: None }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_run(&self) -> Option<SimTime> {
        self.last_run
    }

    /// The first call is always due; after that at most once per interval.
    pub fn is_due(&self, now: SimTime, config: &ClassifierConfig) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now.since(last) >= config.interval_secs,
        }
    }

    /// Re-classify if due.  Returns the transition when the phase changed.
    ///
    /// A failed or undecodable call keeps the previous phase; the attempt
    /// still counts towards the interval.
    pub async fn refresh<S: TextCompletionService>(
        &mut self,
        weather: &str,
        now:     SimTime,
        config:  &ClassifierConfig,
        policy:  &CallPolicy,
        service: &S,
    ) -> Option<PhaseChange> {
        if !self.is_due(now, config) {
            return None;
        }
        self.last_run = Some(now);

        let request = CompletionRequest::new(SYSTEM_PROMPT, format!("Weather: {weather}\nLabel:"))
            .with_max_tokens(16);
        let next = match policy.call(service, &request, "classifier", decode_phase).await {
            Ok(phase) => phase,
            Err(e) => {
                warn!(error = %e, phase = %self.phase, "phase classification failed, keeping previous phase");
                return None;
            }
        };
        if next == self.phase {
            return None;
        }
        let change = PhaseChange { from: self.phase, to: next };
        info!(from = %change.from, to = %change.to, "phase changed");
        self.phase = next;
        Some(change)
    }
}
