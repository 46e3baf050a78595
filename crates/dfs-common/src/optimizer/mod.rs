//! Lineup optimization: roster rules, projection weights and the exact solver.

pub mod lineup;
pub mod roster;
pub mod solver;
pub mod weights;

pub use lineup::{LineupOptions, OptimizeError, build_lineup, build_lineups};
pub use roster::{ROSTER_SIZE, RosterRules, SALARY_CAP, SlotRule};
pub use solver::{Candidate, SolveError, solve};
pub use weights::{LINEUP_WEIGHTS, ProjectionWeights};
