//! Runtime configuration with serde defaults.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Top-level configuration for the feature/explanation core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinsightConfig {
    pub featurization: FeaturizationConfig,
    pub explanation: ExplanationConfig,
}

/// Feature generation and selection tuning.
///
/// The null/correlation thresholds are domain tuning choices, not structural
/// requirements, so they live here rather than inside the selection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizationConfig {
    /// Maximum relationship hops between target and source entity.
    pub max_depth: usize,
    /// Upper bound on distinct item-index values expanded into WHERE
    /// variants per source entity.
    pub max_features: usize,
    /// Null-fraction cutoff for the default selection preset.
    pub null_threshold: f64,
    /// Null-fraction cutoff for the permissive selection preset.
    pub permissive_null_threshold: f64,
    /// Absolute Pearson correlation cutoff for the default preset.
    pub correlation_threshold: f64,
}

impl Default for FeaturizationConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_features: constants::DEFAULT_MAX_FEATURES,
            null_threshold: constants::DEFAULT_NULL_THRESHOLD,
            permissive_null_threshold: constants::PERMISSIVE_NULL_THRESHOLD,
            correlation_threshold: constants::DEFAULT_CORRELATION_THRESHOLD,
        }
    }
}

/// Counterfactual engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    /// z-score bounding the reference interval.
    pub reference_z: f64,
    /// Bound on simultaneous prediction/attribution calls.
    pub max_concurrent_calls: usize,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            reference_z: constants::REFERENCE_INTERVAL_Z,
            max_concurrent_calls: constants::DEFAULT_MAX_CONCURRENT_CALLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ClinsightConfig::default();
        assert_eq!(config.featurization.max_features, 100);
        assert!((config.explanation.reference_z - 1.96).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ClinsightConfig =
            serde_json::from_str(r#"{"featurization": {"max_features": 10}}"#).unwrap();
        assert_eq!(config.featurization.max_features, 10);
        assert_eq!(config.featurization.max_depth, 2);
        assert_eq!(config.explanation.max_concurrent_calls, 8);
    }
}
