use serde::{Deserialize, Serialize};

use crate::PlayerProjection;

/// One optimized roster, serialized as a bare JSON array of player rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lineup {
    pub players: Vec<PlayerProjection>,
}

impl Lineup {
    pub fn new(players: Vec<PlayerProjection>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn total_projected_points(&self) -> f64 {
        self.players.iter().map(|p| p.proj_fpts).sum()
    }

    pub fn total_salary(&self) -> u32 {
        self.players.iter().map(|p| p.salary).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.player == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn row(player: &str, proj_fpts: f64, salary: u32) -> PlayerProjection {
        PlayerProjection {
            year: 2024,
            week: 5,
            player: player.into(),
            position: Position::Wr,
            team: "CIN".into(),
            opponent: "BAL".into(),
            grade: "A".into(),
            rank: 1,
            avg_fpts: 10.0,
            proj_fpts,
            salary,
        }
    }

    #[test]
    fn totals_sum_over_rows() {
        let lineup = Lineup::new(vec![row("A", 10.5, 5000), row("B", 7.25, 4200)]);
        assert!((lineup.total_projected_points() - 17.75).abs() < 1e-9);
        assert_eq!(lineup.total_salary(), 9200);
        assert!(lineup.contains("B"));
        assert_eq!(lineup.len(), 2);
    }

    #[test]
    fn serializes_as_plain_array() {
        let lineup = Lineup::new(vec![row("A", 1.0, 3000)]);
        let json = serde_json::to_value(&lineup).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["player"], "A");
        assert_eq!(json[0]["position"], "WR");

        let back: Lineup = serde_json::from_value(json).unwrap();
        assert_eq!(back, lineup);
    }
}
