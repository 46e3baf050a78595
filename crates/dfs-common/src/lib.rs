pub mod api;
pub mod data;
pub mod logging;
pub mod normalize;
pub mod optimizer;
pub mod run_id;
pub mod selection;
pub mod teams;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Roster position as it appears in salary and projection files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Dst,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Dst,
    ];

    /// Stable slot index used by per-position tables.
    pub const fn index(self) -> usize {
        match self {
            Position::Qb => 0,
            Position::Rb => 1,
            Position::Wr => 2,
            Position::Te => 3,
            Position::Dst => 4,
        }
    }
}

/// One row of the weekly projection table; also the record returned per lineup slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub year: i32,
    pub week: u32,
    pub player: String,
    pub position: Position,
    pub team: String,
    pub opponent: String,
    pub grade: String,
    pub rank: u32,
    #[serde(default)]
    pub avg_fpts: f64,
    pub proj_fpts: f64,
    pub salary: u32,
}
