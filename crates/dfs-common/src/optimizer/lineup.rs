use strum::IntoStaticStr;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::roster::{RosterRules, SlotRule};
use super::solver::{Candidate, SolveError, solve};
use super::weights::{LINEUP_WEIGHTS, ProjectionWeights};
use crate::api::{Lineup, OptimizeRequest};
use crate::normalize::defense_matches;
use crate::{PlayerProjection, Position};

#[derive(Debug, Error, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum OptimizeError {
    #[error("Defense '{0}' not found.")]
    DefenseNotFound(String),
    #[error("{locked} players are locked but the roster only has {slots} slots")]
    TooManyLockedPlayers { locked: u32, slots: u32 },
    #[error("locked players cost ${salary}, more than the ${cap} cap")]
    LockedOverCap { salary: u32, cap: u32 },
    #[error(transparent)]
    Infeasible(#[from] SolveError),
}

/// User choices that shape every lineup of one optimize call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineupOptions {
    pub dst: Option<String>,
    pub one_te: bool,
    pub excluded: Vec<String>,
    pub included: Vec<String>,
}

impl LineupOptions {
    fn defense(&self) -> Option<&str> {
        self.dst
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|p| p == name)
    }

    fn is_included(&self, name: &str) -> bool {
        self.included.iter().any(|p| p == name)
    }
}

impl From<&OptimizeRequest> for LineupOptions {
    fn from(request: &OptimizeRequest) -> Self {
        Self {
            dst: request.defense().map(str::to_string),
            one_te: request.one_te,
            excluded: request.excluded_players.clone(),
            included: request.included_players.clone(),
        }
    }
}

/// One lineup per entry of [`LINEUP_WEIGHTS`], in that order.
pub fn build_lineups(
    projections: &[PlayerProjection],
    options: &LineupOptions,
) -> Result<Vec<Lineup>, OptimizeError> {
    LINEUP_WEIGHTS
        .iter()
        .map(|weights| build_lineup(projections, *weights, options))
        .collect()
}

/// Best legal lineup under `weights` after applying exclusions and locks.
///
/// Returned rows carry the blended projection in `proj_fpts` and keep the order of the
/// projection table.
#[instrument(skip(projections, options), fields(pool = projections.len()))]
pub fn build_lineup(
    projections: &[PlayerProjection],
    weights: ProjectionWeights,
    options: &LineupOptions,
) -> Result<Lineup, OptimizeError> {
    let rows: Vec<PlayerProjection> = projections
        .iter()
        .filter(|row| !options.is_excluded(&row.player))
        .map(|row| PlayerProjection {
            proj_fpts: weights.blend(row.proj_fpts, row.avg_fpts),
            ..row.clone()
        })
        .collect();

    let mut rules = RosterRules::classic(options.one_te);
    let mut locked: Vec<usize> = Vec::new();

    if let Some(dst) = options.defense() {
        let idx = rows
            .iter()
            .position(|row| row.position == Position::Dst && defense_matches(dst, &row.player))
            .ok_or_else(|| OptimizeError::DefenseNotFound(dst.to_string()))?;

        // An included defense is locked with the rest of the included players below.
        if !options.is_included(&rows[idx].player) {
            locked.push(idx);
            rules.set_rule(Position::Dst, SlotRule::Exactly(0));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for name in &options.included {
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name);

        let Some(idx) = rows.iter().position(|row| &row.player == name) else {
            warn!(player = %name, "included player is not in the projection table");
            continue;
        };
        if locked.contains(&idx) {
            continue;
        }

        let position = rows[idx].position;
        let rule = rules.rule(position);
        if rule.minimum() == 0 {
            warn!(player = %name, %position, "position already filled; locking anyway");
        }
        rules.set_rule(position, rule.relaxed());
        locked.push(idx);
    }

    let locked_count = locked.len() as u32;
    if locked_count > rules.slots {
        return Err(OptimizeError::TooManyLockedPlayers {
            locked: locked_count,
            slots: rules.slots,
        });
    }

    let locked_salary: u32 = locked.iter().map(|&i| rows[i].salary).sum();
    if locked_salary > rules.budget {
        return Err(OptimizeError::LockedOverCap {
            salary: locked_salary,
            cap: rules.budget,
        });
    }
    rules.budget -= locked_salary;
    rules.slots -= locked_count;

    let pool: Vec<usize> = (0..rows.len()).filter(|i| !locked.contains(i)).collect();
    let candidates: Vec<Candidate> = pool
        .iter()
        .map(|&i| Candidate {
            position: rows[i].position,
            salary: rows[i].salary,
            points: rows[i].proj_fpts,
        })
        .collect();

    let picked = solve(&candidates, &rules)?;

    let mut chosen: Vec<usize> = locked
        .iter()
        .copied()
        .chain(picked.into_iter().map(|i| pool[i]))
        .collect();
    chosen.sort_unstable();

    let lineup = Lineup::new(chosen.into_iter().map(|i| rows[i].clone()).collect());
    debug!(
        projected = weights.projected,
        average = weights.average,
        locked = locked_count,
        points = lineup.total_projected_points(),
        salary = lineup.total_salary(),
        "built lineup"
    );
    Ok(lineup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, position: Position, salary: u32, proj: f64, avg: f64) -> PlayerProjection {
        PlayerProjection {
            year: 2024,
            week: 8,
            player: player.into(),
            position,
            team: "TM".into(),
            opponent: "OPP".into(),
            grade: "B".into(),
            rank: 1,
            avg_fpts: avg,
            proj_fpts: proj,
            salary,
        }
    }

    #[test]
    fn errors_name_their_reason() {
        let reason: &'static str = (&OptimizeError::DefenseNotFound("Jets".into())).into();
        assert_eq!(reason, "defense_not_found");
        let reason: &'static str = (&OptimizeError::LockedOverCap {
            salary: 51_000,
            cap: 50_000,
        })
            .into();
        assert_eq!(reason, "locked_over_cap");
    }

    fn slate() -> Vec<PlayerProjection> {
        use Position::*;
        vec![
            row("Josh Allen", Qb, 8200, 24.1, 26.3),
            row("Baker Mayfield", Qb, 6100, 19.4, 17.0),
            row("Saquon Barkley", Rb, 8400, 21.7, 23.9),
            row("Bijan Robinson", Rb, 8000, 20.2, 19.5),
            row("Chuba Hubbard", Rb, 6300, 15.1, 14.0),
            row("Tony Pollard", Rb, 5600, 13.2, 12.8),
            row("Rico Dowdle", Rb, 4800, 10.9, 9.1),
            row("Ja'Marr Chase", Wr, 8800, 21.0, 24.4),
            row("Puka Nacua", Wr, 7600, 18.6, 16.2),
            row("Jakobi Meyers", Wr, 5700, 13.4, 12.1),
            row("Jerry Jeudy", Wr, 5000, 12.0, 10.4),
            row("Wan'Dale Robinson", Wr, 4300, 10.1, 10.8),
            row("Jalen McMillan", Wr, 3600, 8.2, 6.5),
            row("Trey McBride", Te, 6200, 13.9, 12.7),
            row("Jonnu Smith", Te, 4200, 9.8, 10.6),
            row("Ravens", Dst, 3400, 8.1, 7.2),
            row("Broncos", Dst, 3100, 7.7, 9.0),
        ]
    }

    fn assert_legal(lineup: &Lineup) {
        assert_eq!(lineup.len(), 9);
        assert!(lineup.total_salary() <= 50_000);
        let count = |position| {
            lineup
                .players
                .iter()
                .filter(|p| p.position == position)
                .count()
        };
        assert_eq!(count(Position::Qb), 1);
        assert!(count(Position::Rb) >= 2);
        assert!(count(Position::Wr) >= 3);
        assert!(count(Position::Te) >= 1);
        assert_eq!(count(Position::Dst), 1);
    }

    #[test]
    fn builds_one_legal_lineup_per_weight() {
        let lineups = build_lineups(&slate(), &LineupOptions::default()).unwrap();
        assert_eq!(lineups.len(), LINEUP_WEIGHTS.len());
        for lineup in &lineups {
            assert_legal(lineup);
        }
    }

    #[test]
    fn lineup_rows_keep_table_order_and_blend_points() {
        let table = slate();
        let lineups = build_lineups(&table, &LineupOptions::default()).unwrap();

        let order: Vec<usize> = lineups[0]
            .players
            .iter()
            .map(|p| table.iter().position(|r| r.player == p.player).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));

        for (lineup, weights) in lineups.iter().zip(LINEUP_WEIGHTS) {
            for player in &lineup.players {
                let source = table.iter().find(|r| r.player == player.player).unwrap();
                assert_eq!(player.proj_fpts, weights.blend(source.proj_fpts, source.avg_fpts));
                assert_eq!(player.avg_fpts, source.avg_fpts);
            }
        }
    }

    #[test]
    fn excluded_players_never_appear() {
        let options = LineupOptions {
            excluded: vec!["Josh Allen".into(), "Ja'Marr Chase".into()],
            ..LineupOptions::default()
        };
        for lineup in build_lineups(&slate(), &options).unwrap() {
            assert!(!lineup.contains("Josh Allen"));
            assert!(!lineup.contains("Ja'Marr Chase"));
            assert_legal(&lineup);
        }
    }

    #[test]
    fn included_players_always_appear() {
        let options = LineupOptions {
            included: vec!["Rico Dowdle".into(), "Jonnu Smith".into(), "Nobody".into()],
            ..LineupOptions::default()
        };
        for lineup in build_lineups(&slate(), &options).unwrap() {
            assert!(lineup.contains("Rico Dowdle"));
            assert!(lineup.contains("Jonnu Smith"));
            assert_legal(&lineup);
        }
    }

    #[test]
    fn exclusion_beats_inclusion() {
        let options = LineupOptions {
            excluded: vec!["Puka Nacua".into()],
            included: vec!["Puka Nacua".into()],
            ..LineupOptions::default()
        };
        let lineup = build_lineup(&slate(), LINEUP_WEIGHTS[0], &options).unwrap();
        assert!(!lineup.contains("Puka Nacua"));
    }

    #[test]
    fn requested_defense_takes_the_dst_slot() {
        let options = LineupOptions {
            dst: Some("bronc".into()),
            ..LineupOptions::default()
        };
        let table = slate();
        let lineup = build_lineup(&table, LINEUP_WEIGHTS[0], &options).unwrap();
        assert!(lineup.contains("Broncos"));
        assert!(!lineup.contains("Ravens"));
        assert_legal(&lineup);

        let options = LineupOptions {
            dst: Some("RAVENS".into()),
            ..LineupOptions::default()
        };
        let lineup = build_lineup(&table, LINEUP_WEIGHTS[0], &options).unwrap();
        assert!(lineup.contains("Ravens"));
        assert!(!lineup.contains("Broncos"));
    }

    #[test]
    fn unknown_defense_is_an_error() {
        let options = LineupOptions {
            dst: Some("Jets".into()),
            ..LineupOptions::default()
        };
        assert_eq!(
            build_lineups(&slate(), &options),
            Err(OptimizeError::DefenseNotFound("Jets".into()))
        );
    }

    #[test]
    fn excluded_defense_cannot_be_requested() {
        let options = LineupOptions {
            dst: Some("Ravens".into()),
            excluded: vec!["Ravens".into()],
            ..LineupOptions::default()
        };
        assert!(matches!(
            build_lineup(&slate(), LINEUP_WEIGHTS[0], &options),
            Err(OptimizeError::DefenseNotFound(_))
        ));
    }

    #[test]
    fn one_te_keeps_a_single_tight_end() {
        let mut table = slate();
        table.push(row("George Kittle", Position::Te, 3000, 30.0, 30.0));
        let options = LineupOptions {
            one_te: true,
            ..LineupOptions::default()
        };
        let lineup = build_lineup(&table, LINEUP_WEIGHTS[0], &options).unwrap();
        let tight_ends = lineup
            .players
            .iter()
            .filter(|p| p.position == Position::Te)
            .count();
        assert_eq!(tight_ends, 1);
        assert!(lineup.contains("George Kittle"));
    }

    #[test]
    fn locking_too_many_players_fails() {
        let table = slate();
        let options = LineupOptions {
            included: table.iter().take(10).map(|p| p.player.clone()).collect(),
            ..LineupOptions::default()
        };
        assert!(matches!(
            build_lineup(&table, LINEUP_WEIGHTS[0], &options),
            Err(OptimizeError::TooManyLockedPlayers { locked: 10, slots: 9 })
        ));
    }

    #[test]
    fn locked_salary_over_cap_fails() {
        let mut table = slate();
        table.push(row("Expensive", Position::Wr, 45_000, 1.0, 1.0));
        let options = LineupOptions {
            included: vec!["Expensive".into(), "Josh Allen".into()],
            ..LineupOptions::default()
        };
        assert!(matches!(
            build_lineup(&table, LINEUP_WEIGHTS[0], &options),
            Err(OptimizeError::LockedOverCap { salary: 53_200, cap: 50_000 })
        ));
    }

    #[test]
    fn thin_pool_is_infeasible() {
        let table: Vec<_> = slate()
            .into_iter()
            .filter(|p| p.position != Position::Wr)
            .collect();
        assert!(matches!(
            build_lineup(&table, LINEUP_WEIGHTS[0], &LineupOptions::default()),
            Err(OptimizeError::Infeasible(_))
        ));
    }

    #[test]
    fn options_come_from_request() {
        let request = OptimizeRequest {
            week: Some(3),
            dst: Some("  ".into()),
            one_te: true,
            excluded_players: vec!["A".into()],
            included_players: vec!["B".into()],
        };
        let options = LineupOptions::from(&request);
        assert_eq!(options.dst, None);
        assert!(options.one_te);
        assert_eq!(options.excluded, vec!["A".to_string()]);
        assert_eq!(options.included, vec!["B".to_string()]);
    }
}
