use std::collections::HashMap;

use tracing::debug;

use super::records::{RankingRow, SalaryRow};
use super::slate::Slate;
use crate::normalize::normalize_player_name;
use crate::{PlayerProjection, Position};

/// Start/sit grades too poor to be worth rostering.
pub const EXCLUDED_GRADES: [&str; 4] = ["F", "D-", "D", "D+"];

pub fn is_excluded_grade(grade: &str) -> bool {
    EXCLUDED_GRADES.contains(&grade.trim())
}

/// Join rankings with salaries into the weekly projection table.
///
/// Rows keep ranking order. A player without a salary row is dropped, and when a salary
/// export lists the same `(player, position)` twice the first row wins.
pub fn assemble_projections(
    slate: Slate,
    rankings: &[RankingRow],
    salaries: &[SalaryRow],
) -> Vec<PlayerProjection> {
    let mut by_key: HashMap<(String, Position), &SalaryRow> = HashMap::new();
    for row in salaries {
        by_key
            .entry((normalize_player_name(&row.player, row.position), row.position))
            .or_insert(row);
    }

    let mut out: Vec<PlayerProjection> = Vec::with_capacity(rankings.len());
    let mut graded_out = 0usize;
    let mut unpriced = 0usize;

    for ranking in rankings {
        if is_excluded_grade(&ranking.grade) {
            graded_out += 1;
            continue;
        }

        let player = normalize_player_name(&ranking.player, ranking.position);
        let Some(salary) = by_key.get(&(player.clone(), ranking.position)) else {
            unpriced += 1;
            continue;
        };

        let row = PlayerProjection {
            year: slate.year,
            week: slate.week,
            player,
            position: ranking.position,
            team: salary.team.clone(),
            opponent: salary.opponent.clone(),
            grade: ranking.grade.trim().to_string(),
            rank: ranking.rank,
            avg_fpts: ranking.avg_fpts.unwrap_or(0.0),
            proj_fpts: ranking.proj_fpts,
            salary: salary.salary,
        };

        if !out.contains(&row) {
            out.push(row);
        }
    }

    debug!(
        %slate,
        rows = out.len(),
        graded_out,
        unpriced,
        "assembled projection table"
    );
    out
}
