//! Plain-text rendering of lineups, tabs and the selection panel.

use dfs_common::PlayerProjection;
use dfs_common::api::Lineup;
use dfs_common::selection::PlayerSelection;

/// Lineup table columns, in display order.
pub const COLUMNS: [&str; 11] = [
    "year",
    "week",
    "player",
    "position",
    "team",
    "opponent",
    "grade",
    "rank",
    "avg_fpts",
    "proj_fpts",
    "salary",
];

const ACTIONS_HEADER: &str = "Actions";
const ACTIONS: &str = "[x] [+]";

/// `avg_fpts` -> `Avg_fpts`.
pub fn header_label(column: &str) -> String {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn cell(player: &PlayerProjection, column: &str) -> String {
    match column {
        "year" => player.year.to_string(),
        "week" => player.week.to_string(),
        "player" => player.player.clone(),
        "position" => player.position.to_string(),
        "team" => player.team.clone(),
        "opponent" => player.opponent.clone(),
        "grade" => player.grade.clone(),
        "rank" => player.rank.to_string(),
        "avg_fpts" => player.avg_fpts.to_string(),
        "proj_fpts" => player.proj_fpts.to_string(),
        "salary" => player.salary.to_string(),
        _ => String::new(),
    }
}

pub fn summary_line(lineup: &Lineup) -> String {
    format!(
        "Total Projected FPTS: {:.2} - Total Cap: ${}",
        lineup.total_projected_points(),
        lineup.total_salary()
    )
}

/// Summary line followed by the lineup table.
///
/// The last column offers exclude/include actions only for players the user has not
/// already decided on.
pub fn render_lineup(lineup: &Lineup, selection: &PlayerSelection) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(lineup.len() + 1);
    let mut header: Vec<String> = COLUMNS.iter().map(|c| header_label(c)).collect();
    header.push(ACTIONS_HEADER.to_string());
    rows.push(header);

    for player in &lineup.players {
        let mut row: Vec<String> = COLUMNS.iter().map(|c| cell(player, c)).collect();
        row.push(if selection.is_undecided(&player.player) {
            ACTIONS.to_string()
        } else {
            String::new()
        });
        rows.push(row);
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = summary_line(lineup);
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
        if i == 0 {
            let rule = widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(&rule);
            out.push('\n');
        }
    }
    out
}

/// `[Lineup 1]  Lineup 2  Lineup 3` with the active tab bracketed.
pub fn render_tabs(count: usize, active: usize) -> String {
    (0..count)
        .map(|i| {
            if i == active {
                format!("[Lineup {}]", i + 1)
            } else {
                format!(" Lineup {} ", i + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_side_panel(selection: &PlayerSelection) -> String {
    let mut out = String::from("Excluded Players:\n");
    for name in selection.excluded() {
        out.push_str(&format!("  - {name}\n"));
    }
    out.push_str("Included Players:\n");
    for name in selection.included() {
        out.push_str(&format!("  - {name}\n"));
    }
    out
}
