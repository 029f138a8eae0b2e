//! Demographic profile and the two factor sets derived from it.
//!
//! Both [`Modifiers`] and [`PersonalityWeights`] are computed once when an
//! agent is created and never change afterwards.

use std::collections::BTreeMap;

use hm_core::{Activity, AoiId};
use serde::{Deserialize, Serialize};

// ── Education / Gender ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    HighSchool,
    #[default]
    Bachelor,
    Master,
    Phd,
    Other,
}

impl Education {
    /// Lenient label parse; unrecognised labels map to `Other`.
    pub fn from_label(label: &str) -> Education {
        match label.trim().to_ascii_lowercase().as_str() {
            "high_school" | "highschool" | "high school" => Education::HighSchool,
            "bachelor" => Education::Bachelor,
            "master" => Education::Master,
            "phd" => Education::Phd,
            _ => Education::Other,
        }
    }

    pub fn is_graduate(self) -> bool {
        matches!(self, Education::Master | Education::Phd)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_label(label: &str) -> Gender {
        match label.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

// ── Profile ───────────────────────────────────────────────────────────────────

/// Immutable demographic attributes of one agent.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub age:       u32,
    pub income:    f64,
    pub education: Education,
    pub gender:    Gender,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            age:       35,
            income:    50_000.0,
            education: Education::Bachelor,
            gender:    Gender::Male,
        }
    }
}

/// Fixed anchors plus the location last observed in the environment.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Location {
    pub current: Option<AoiId>,
    pub home:    Option<AoiId>,
    pub work:    Option<AoiId>,
}

impl Location {
    pub fn at_home(&self) -> bool {
        self.current.is_some() && self.current == self.home
    }

    pub fn at_work(&self) -> bool {
        self.current.is_some() && self.current == self.work
    }
}

// ── Modifiers ─────────────────────────────────────────────────────────────────

/// One multiplicative travel factor per demographic dimension.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Modifiers {
    pub age:       f64,
    pub income:    f64,
    pub education: f64,
    pub gender:    f64,
}

impl Modifiers {
    pub const NEUTRAL: Modifiers = Modifiers { age: 1.0, income: 1.0, education: 1.0, gender: 1.0 };

    pub fn from_profile(profile: &Profile) -> Modifiers {
        let age = if profile.age < 25 {
            1.15
        } else if profile.age >= 65 {
            0.75
        } else {
            1.0
        };
        let income = if profile.income > 80_000.0 {
            1.1
        } else if profile.income < 30_000.0 {
            0.9
        } else {
            1.0
        };
        let education = if profile.education.is_graduate() { 1.05 } else { 1.0 };
        let gender = if profile.gender == Gender::Female { 0.95 } else { 1.0 };
        Modifiers { age, income, education, gender }
    }

    pub fn product(&self) -> f64 {
        self.age * self.income * self.education * self.gender
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

// ── PersonalityWeights ────────────────────────────────────────────────────────

/// Per-activity preference weight; activities without an entry weigh 1.0.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PersonalityWeights(BTreeMap<Activity, f64>);

impl PersonalityWeights {
    /// Rules are applied in a fixed order; a later rule overwrites the
    /// weight an earlier one set for the same activity.
    pub fn from_profile(profile: &Profile) -> PersonalityWeights {
        use Activity as A;

        let mut weights = PersonalityWeights::default();
        if profile.age < 30 {
            weights.set_all(&[
                (A::Nightlife, 1.5), (A::Entertainment, 1.3), (A::Exercise, 1.2),
                (A::SocialVisit, 1.3), (A::WeekendOuting, 1.2),
            ]);
        } else if profile.age >= 60 {
            weights.set_all(&[
                (A::Medical, 1.4), (A::Religious, 1.3), (A::MorningExercise, 1.2),
                (A::Nightlife, 0.3), (A::Entertainment, 0.8),
            ]);
        }
        if profile.income > 75_000.0 {
            weights.set_all(&[(A::Entertainment, 1.2), (A::PersonalCare, 1.3), (A::WeekendOuting, 1.2)]);
        } else if profile.income < 35_000.0 {
            weights.set_all(&[(A::Entertainment, 0.8), (A::PersonalCare, 0.7), (A::Shopping, 0.9)]);
        }
        if profile.education.is_graduate() {
            weights.set_all(&[(A::Education, 1.3), (A::Entertainment, 1.1)]);
        }
        weights
    }

    pub fn get(&self, activity: Activity) -> f64 {
        self.0.get(&activity).copied().unwrap_or(1.0)
    }

    pub fn set(&mut self, activity: Activity, weight: f64) {
        self.0.insert(activity, weight);
    }

    fn set_all(&mut self, pairs: &[(Activity, f64)]) {
        for &(activity, weight) in pairs {
            self.set(activity, weight);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
