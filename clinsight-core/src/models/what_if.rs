use serde::{Deserialize, Serialize};

/// Re-scored outcome after clamping one out-of-range feature to its
/// reference-interval boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    /// The perturbed feature's own attribution value under the new prediction.
    pub attribution: f64,
    /// Updated positive-class probability.
    pub prediction: f64,
}
