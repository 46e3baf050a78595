use serde::{Deserialize, Deserializer, Serialize};

use crate::Position;
use crate::normalize::normalize_opponent;

/// One row of a DraftKings salary export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRow {
    pub player: String,
    pub position: Position,
    pub team: String,
    #[serde(deserialize_with = "opponent_code")]
    pub opponent: String,
    #[serde(deserialize_with = "dollars")]
    pub salary: u32,
}

/// One row of the weekly expert rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub player: String,
    pub position: Position,
    pub rank: u32,
    pub grade: String,
    pub proj_fpts: f64,
    #[serde(default)]
    pub avg_fpts: Option<f64>,
}

fn opponent_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_opponent(&raw))
}

/// Accepts `5400`, `$5400` and `$5,400`.
fn dollars<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_dollars(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid salary {raw:?}")))
}

pub(crate) fn parse_dollars(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}
