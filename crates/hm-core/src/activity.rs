//! The closed set of activities an agent can travel for, and the ten
//! fixed time slots the activity tables are keyed by.

use std::fmt;
use std::str::FromStr;

use crate::HmError;

// ── Activity ──────────────────────────────────────────────────────────────────

/// Why an agent leaves its current location.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Work,
    Lunch,
    GoHome,
    Shopping,
    Grocery,
    Medical,
    Exercise,
    SocialVisit,
    Entertainment,
    Education,
    Religious,
    PersonalCare,
    BankErrands,
    MorningExercise,
    EveningLeisure,
    Nightlife,
    WeekendOuting,
}

impl Activity {
    pub const ALL: [Activity; 17] = [
        Activity::Work,
        Activity::Lunch,
        Activity::GoHome,
        Activity::Shopping,
        Activity::Grocery,
        Activity::Medical,
        Activity::Exercise,
        Activity::SocialVisit,
        Activity::Entertainment,
        Activity::Education,
        Activity::Religious,
        Activity::PersonalCare,
        Activity::BankErrands,
        Activity::MorningExercise,
        Activity::EveningLeisure,
        Activity::Nightlife,
        Activity::WeekendOuting,
    ];

    /// Snake-case label used in configs, CSV files, and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Activity::Work            => "work",
            Activity::Lunch           => "lunch",
            Activity::GoHome          => "go_home",
            Activity::Shopping        => "shopping",
            Activity::Grocery         => "grocery",
            Activity::Medical         => "medical",
            Activity::Exercise        => "exercise",
            Activity::SocialVisit     => "social_visit",
            Activity::Entertainment   => "entertainment",
            Activity::Education       => "education",
            Activity::Religious       => "religious",
            Activity::PersonalCare    => "personal_care",
            Activity::BankErrands     => "bank_errands",
            Activity::MorningExercise => "morning_exercise",
            Activity::EveningLeisure  => "evening_leisure",
            Activity::Nightlife       => "nightlife",
            Activity::WeekendOuting   => "weekend_outing",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = HmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Activity::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| HmError::Parse(format!("unknown activity {s:?}")))
    }
}

// ── TimeSlot ──────────────────────────────────────────────────────────────────

/// `[start, end)` hour bounds of each slot, in slot order.
const SLOT_BOUNDS: [(u8, u8); TimeSlot::COUNT] = [
    (0, 6), (6, 8), (8, 10), (10, 12), (12, 14),
    (14, 16), (16, 18), (18, 20), (20, 22), (22, 24),
];

/// One of the ten fixed intra-day slots used by the activity tables.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub const COUNT: usize = 10;

    /// The slot containing `hour`.  Hours ≥ 24 fall into the last slot.
    pub fn of_hour(hour: u8) -> TimeSlot {
        let idx = SLOT_BOUNDS
            .iter()
            .position(|&(start, end)| start <= hour && hour < end)
            .unwrap_or(Self::COUNT - 1);
        TimeSlot(idx as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn start_hour(self) -> u8 {
        SLOT_BOUNDS[self.index()].0
    }

    pub fn end_hour(self) -> u8 {
        SLOT_BOUNDS[self.index()].1
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start_hour(), self.end_hour())
    }
}
