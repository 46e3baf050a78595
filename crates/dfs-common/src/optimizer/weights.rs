/// One lineup per entry, in response order.
/// Pure projection first, then two blends that lean on recent form.
pub const LINEUP_WEIGHTS: [ProjectionWeights; 3] = [
    ProjectionWeights {
        projected: 1.0,
        average: 0.0,
    },
    ProjectionWeights {
        projected: 0.9,
        average: 0.1,
    },
    ProjectionWeights {
        projected: 0.8,
        average: 0.2,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionWeights {
    pub projected: f64,
    pub average: f64,
}

impl ProjectionWeights {
    /// Working projection for one player under these weights.
    pub fn blend(&self, proj_fpts: f64, avg_fpts: f64) -> f64 {
        if self.average > 0.0 {
            round1(proj_fpts * self.projected + avg_fpts * self.average)
        } else {
            proj_fpts
        }
    }
}

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
