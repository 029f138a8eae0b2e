//! CSV profile loader.
//!
//! # CSV format
//!
//! One row per agent.  Every column except `agent_id` may be left empty to
//! take the default.
//!
//! ```csv
//! agent_id,age,income,education,gender,home_aoi,work_aoi
//! 0,34,62000,master,female,500000012,500000040
//! 1,71,28000,high_school,male,500000013,
//! 2,,,,,500000014,500000040
//! ```
//!
//! Agents absent from the CSV receive [`Profile::default`] and no anchors.
//! Anchor ids must be positive AOI ids.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use hm_core::AoiId;
use serde::Deserialize;

use crate::{BehaviorError, BehaviorResult, Education, Gender, Profile};

/// One agent's profile plus its fixed anchors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentSetup {
    pub profile: Profile,
    pub home:    Option<AoiId>,
    pub work:    Option<AoiId>,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProfileRecord {
    agent_id:  u32,
    age:       Option<u32>,
    income:    Option<f64>,
    education: Option<String>,
    gender:    Option<String>,
    home_aoi:  Option<i64>,
    work_aoi:  Option<i64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-agent setups from a CSV file.
///
/// Returns a `Vec` of length `agent_count`, indexed by `AgentId`.
pub fn load_profiles_csv(path: &Path, agent_count: usize) -> BehaviorResult<Vec<AgentSetup>> {
    let file = std::fs::File::open(path)?;
    load_profiles_reader(file, agent_count)
}

/// Like [`load_profiles_csv`] but accepts any `Read` source.
pub fn load_profiles_reader<R: Read>(reader: R, agent_count: usize) -> BehaviorResult<Vec<AgentSetup>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_agent: HashMap<u32, AgentSetup> = HashMap::new();

    for result in csv_reader.deserialize::<ProfileRecord>() {
        let row = result.map_err(|e| BehaviorError::Parse(e.to_string()))?;
        if row.agent_id as usize >= agent_count {
            return Err(BehaviorError::Parse(format!(
                "agent_id {} out of range for {agent_count} agents",
                row.agent_id
            )));
        }
        let id = row.agent_id;
        let setup = into_setup(row)?;
        if by_agent.insert(id, setup).is_some() {
            return Err(BehaviorError::Parse(format!("agent_id {id} appears twice")));
        }
    }

    Ok((0..agent_count as u32)
        .map(|i| by_agent.remove(&i).unwrap_or_default())
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn into_setup(row: ProfileRecord) -> BehaviorResult<AgentSetup> {
    let defaults = Profile::default();
    let income = row.income.unwrap_or(defaults.income);
    if !income.is_finite() || income < 0.0 {
        return Err(BehaviorError::Parse(format!(
            "agent_id {}: invalid income {income}",
            row.agent_id
        )));
    }
    let profile = Profile {
        age: row.age.unwrap_or(defaults.age),
        income,
        education: non_empty(row.education).map_or(defaults.education, |s| Education::from_label(&s)),
        gender: non_empty(row.gender).map_or(defaults.gender, |s| Gender::from_label(&s)),
    };
    Ok(AgentSetup {
        profile,
        home: parse_anchor(row.agent_id, "home_aoi", row.home_aoi)?,
        work: parse_anchor(row.agent_id, "work_aoi", row.work_aoi)?,
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

fn parse_anchor(agent_id: u32, column: &str, raw: Option<i64>) -> BehaviorResult<Option<AoiId>> {
    match raw {
        None => Ok(None),
        Some(n) => AoiId::from_raw(n).map(Some).ok_or_else(|| {
            BehaviorError::Parse(format!("agent_id {agent_id}: invalid {column} {n}"))
        }),
    }
}
