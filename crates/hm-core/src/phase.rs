//! Disruption regime shared across every engine crate.
//!
//! The phase is the agent's current reading of the environment: before a
//! hurricane (`Normal`), while it is hitting (`During`), or in the recovery
//! period afterwards (`After`).  Every probability table is keyed by phase.

use std::fmt;
use std::str::FromStr;

use crate::HmError;

/// The regime an agent believes it is in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Phase {
    #[default]
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "During_Hurricane")]
    During,
    #[serde(rename = "After_Hurricane")]
    After,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Normal, Phase::During, Phase::After];

    /// Dense index for per-phase arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Phase::Normal => 0,
            Phase::During => 1,
            Phase::After  => 2,
        }
    }

    /// The literal token the classifier contract expects.
    pub fn as_token(self) -> &'static str {
        match self {
            Phase::Normal => "Normal",
            Phase::During => "During_Hurricane",
            Phase::After  => "After_Hurricane",
        }
    }

    /// Parse one of the three literal tokens.  No trimming, no case folding.
    pub fn from_token(s: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.as_token() == s)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for Phase {
    type Err = HmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::from_token(s.trim())
            .ok_or_else(|| HmError::Parse(format!("unknown phase {s:?}")))
    }
}

// ── PerPhase ──────────────────────────────────────────────────────────────────

/// One value per phase.  Serializes as `{ "normal": .., "during": .., "after": .. }`.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PerPhase<T> {
    pub normal: T,
    pub during: T,
    pub after:  T,
}

impl<T> PerPhase<T> {
    pub fn new(normal: T, during: T, after: T) -> Self {
        Self { normal, during, after }
    }

    /// Build every slot from a closure over the phase.
    pub fn from_fn(mut f: impl FnMut(Phase) -> T) -> Self {
        Self { normal: f(Phase::Normal), during: f(Phase::During), after: f(Phase::After) }
    }

    #[inline]
    pub fn get(&self, phase: Phase) -> &T {
        match phase {
            Phase::Normal => &self.normal,
            Phase::During => &self.during,
            Phase::After  => &self.after,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, phase: Phase) -> &mut T {
        match phase {
            Phase::Normal => &mut self.normal,
            Phase::During => &mut self.during,
            Phase::After  => &mut self.after,
        }
    }

    /// `(phase, value)` pairs in `Phase::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &T)> {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}
