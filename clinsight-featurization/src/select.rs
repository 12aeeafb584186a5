//! Threshold-based feature selection.
//!
//! Two strictness presets: the default drops mostly-null, uninformative, and
//! highly correlated columns; the permissive preset only drops unfiltered
//! columns that are almost entirely null, so rare-but-important per-item
//! measurements survive.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::info;

use clinsight_core::config::FeaturizationConfig;
use clinsight_core::errors::FeaturizationError;
use clinsight_core::matrix::{FeatureColumn, FeatureMatrix};
use clinsight_core::models::Feature;
use clinsight_core::table::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPreset {
    Default,
    Permissive,
}

impl FromStr for SelectionPreset {
    type Err = FeaturizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SelectionPreset::Default),
            "permissive" => Ok(SelectionPreset::Permissive),
            other => Err(FeaturizationError::UnknownSelectionPreset {
                value: other.to_string(),
            }),
        }
    }
}

/// Prune matrix columns in place per the preset, keeping `features` in
/// lockstep.
pub fn select_features(
    matrix: &mut FeatureMatrix,
    features: &mut Vec<Feature>,
    preset: SelectionPreset,
    config: &FeaturizationConfig,
) {
    let drop = match preset {
        SelectionPreset::Default => default_drops(matrix, config),
        SelectionPreset::Permissive => permissive_drops(matrix, features, config),
    };
    for name in &drop {
        matrix.drop_column(name);
    }
    features.retain(|f| !drop.contains(&f.name));
    info!(
        dropped = drop.len(),
        kept = matrix.n_cols(),
        preset = ?preset,
        "feature selection finished"
    );
}

fn default_drops(matrix: &FeatureMatrix, config: &FeaturizationConfig) -> Vec<String> {
    let mut drop = Vec::new();
    let mut kept: Vec<&FeatureColumn> = Vec::new();

    for column in matrix.columns() {
        if null_fraction(&column.values) > config.null_threshold {
            drop.push(column.name.clone());
            continue;
        }
        if distinct_non_null(&column.values) <= 1 {
            drop.push(column.name.clone());
            continue;
        }
        let correlated = kept.iter().any(|k| {
            pearson(&k.values, &column.values)
                .is_some_and(|r| r.abs() >= config.correlation_threshold)
        });
        if correlated {
            drop.push(column.name.clone());
        } else {
            kept.push(column);
        }
    }
    drop
}

/// Null-threshold pass only, and never against filtered (WHERE) columns.
fn permissive_drops(
    matrix: &FeatureMatrix,
    features: &[Feature],
    config: &FeaturizationConfig,
) -> Vec<String> {
    let filtered: BTreeSet<&str> = features
        .iter()
        .filter(|f| f.is_filtered())
        .map(|f| f.name.as_str())
        .collect();

    matrix
        .columns()
        .iter()
        .filter(|c| !filtered.contains(c.name.as_str()))
        .filter(|c| null_fraction(&c.values) > config.permissive_null_threshold)
        .map(|c| c.name.clone())
        .collect()
}

fn null_fraction(values: &[Value]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| v.is_null()).count() as f64 / values.len() as f64
}

fn distinct_non_null(values: &[Value]) -> usize {
    values
        .iter()
        .filter_map(Value::as_key)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Pearson correlation over rows where both cells are numeric. `None` when
/// fewer than two paired samples exist or either side has zero variance.
fn pearson(a: &[Value], b: &[Value]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(vals: &[f64]) -> Vec<Value> {
        vals.iter().map(|v| Value::Number(*v)).collect()
    }

    #[test]
    fn preset_parsing() {
        assert_eq!(
            "default".parse::<SelectionPreset>().unwrap(),
            SelectionPreset::Default
        );
        assert_eq!(
            "permissive".parse::<SelectionPreset>().unwrap(),
            SelectionPreset::Permissive
        );
        assert!(matches!(
            "strict".parse::<SelectionPreset>(),
            Err(FeaturizationError::UnknownSelectionPreset { .. })
        ));
    }

    #[test]
    fn pearson_of_identical_columns_is_one() {
        let a = numbers(&[1.0, 2.0, 3.0]);
        let r = pearson(&a, &a).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_skips_constant_columns() {
        let a = numbers(&[1.0, 2.0, 3.0]);
        let b = numbers(&[5.0, 5.0, 5.0]);
        assert_eq!(pearson(&a, &b), None);
    }

    #[test]
    fn null_fraction_ignores_nothing() {
        let values = vec![Value::Null, Value::Number(1.0), Value::Null, Value::Null];
        assert!((null_fraction(&values) - 0.75).abs() < 1e-12);
    }
}
