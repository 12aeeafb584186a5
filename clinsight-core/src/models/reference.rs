use serde::{Deserialize, Serialize};

/// Population statistics for one numeric feature or measurement column.
///
/// `low`/`high` bound the 95% reference interval under a normal
/// approximation (mean ± z·std) — an explicit approximation, not a
/// distributional guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInterval {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
    pub low: f64,
    pub high: f64,
}

impl ReferenceInterval {
    /// Build from mean/std/count with the given z-score.
    pub fn from_stats(mean: f64, std: f64, count: usize, z: f64) -> Self {
        Self {
            mean,
            std,
            count,
            low: mean - z * std,
            high: mean + z * std,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}
