use std::fmt;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SALARY_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^dk_salary_(\d{4})_w(\d{1,2})\.csv$").unwrap());

/// One week of games, the unit every data file is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slate {
    pub year: i32,
    pub week: u32,
}

impl Slate {
    pub const fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Parse `dk_salary_{year}_w{week}.csv`.
    pub fn from_salary_file_name(name: &str) -> Option<Self> {
        let caps = SALARY_FILE.captures(name)?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        let week = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { year, week })
    }

    /// Fill in whatever the caller left out.
    ///
    /// Missing parts come from the most recent salary slate on disk. With nothing on disk
    /// the year is taken from `today` and the week defaults to 1.
    pub fn resolve(
        latest: Option<Slate>,
        year: Option<i32>,
        week: Option<u32>,
        today: NaiveDate,
    ) -> Self {
        let year = year
            .or(latest.map(|slate| slate.year))
            .unwrap_or_else(|| today.year());
        let week = week.or(latest.map(|slate| slate.week)).unwrap_or(1);
        Self { year, week }
    }
}

impl fmt::Display for Slate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_w{}", self.year, self.week)
    }
}
