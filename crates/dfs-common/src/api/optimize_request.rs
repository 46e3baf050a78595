use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::selection::PlayerSelection;
use crate::teams::NflTeam;

/// Last week of the NFL regular season.
pub const MAX_WEEK: u32 = 18;

/// Body of `POST /optimize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub week: Option<u32>,
    /// Defense to lock in, matched by nickname substring (e.g. "ravens").
    #[serde(default)]
    pub dst: Option<String>,
    /// Play exactly one TE instead of allowing a TE in the flex slot.
    #[serde(default, deserialize_with = "null_as_false")]
    pub one_te: bool,
    #[serde(default, alias = "excludedPlayers")]
    pub excluded_players: Vec<String>,
    #[serde(default, alias = "includedPlayers")]
    pub included_players: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestValidationError {
    #[error("week must be between 1 and 18, got {0}")]
    WeekOutOfRange(u32),
    #[error("Defense '{0}' does not match any team")]
    UnknownDefense(String),
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl OptimizeRequest {
    /// Build a request from form state the way the lineup screen submits it:
    /// a blank defense is sent as `null`.
    pub fn from_form(
        week: Option<u32>,
        dst: Option<&str>,
        one_te: bool,
        selection: &PlayerSelection,
    ) -> Self {
        Self {
            week,
            dst: dst
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            one_te,
            excluded_players: selection.excluded().to_vec(),
            included_players: selection.included().to_vec(),
        }
    }

    /// The requested defense, ignoring blank strings.
    pub fn defense(&self) -> Option<&str> {
        self.dst
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if let Some(week) = self.week {
            if !(1..=MAX_WEEK).contains(&week) {
                return Err(RequestValidationError::WeekOutOfRange(week));
            }
        }

        if let Some(dst) = self.defense() {
            if NflTeam::matching(dst).is_empty() {
                return Err(RequestValidationError::UnknownDefense(dst.to_string()));
            }
        }

        Ok(())
    }
}
