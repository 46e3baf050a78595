use serde::{Deserialize, Serialize};

/// Body of `POST /projections`; both fields fall back to the latest stored slate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionsRequest {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub week: Option<u32>,
}
