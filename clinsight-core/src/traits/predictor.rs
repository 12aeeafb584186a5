use crate::errors::ClinsightResult;
use crate::matrix::FeatureRow;

/// External prediction model plus attribution method.
///
/// Must accept single rows synthesized by the counterfactual engine, not just
/// rows that exist in the feature matrix.
pub trait IPredictor: Send + Sync {
    /// Positive-class probability for one feature row.
    fn predict_proba(&self, row: &FeatureRow) -> ClinsightResult<f64>;

    /// Per-feature attribution values, aligned one-to-one with the row's
    /// feature columns.
    fn attribute(&self, row: &FeatureRow) -> ClinsightResult<Vec<f64>>;
}
