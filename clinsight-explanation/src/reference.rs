//! Population reference statistics.

use std::collections::BTreeMap;

use clinsight_core::matrix::FeatureMatrix;
use clinsight_core::models::ReferenceInterval;
use clinsight_core::table::{Table, Value};

/// Per-feature reference intervals over the matrix, or over a cohort subset
/// of its instances.
///
/// Only numeric cells contribute. Features with fewer than two numeric
/// samples or zero/non-finite spread are skipped entirely: a constant column
/// has no meaningful out-of-range notion.
pub fn reference_intervals(
    matrix: &FeatureMatrix,
    cohort: Option<&[String]>,
    z: f64,
) -> BTreeMap<String, ReferenceInterval> {
    let rows = cohort.map(|ids| matrix.rows_for(ids));

    let mut out = BTreeMap::new();
    for column in matrix.columns() {
        let values: Vec<f64> = match &rows {
            None => column.values.iter().filter_map(Value::as_f64).collect(),
            Some(rows) => rows
                .iter()
                .filter_map(|&row| column.values[row].as_f64())
                .collect(),
        };
        if let Some(interval) = interval_of(&values, z) {
            out.insert(column.name.clone(), interval);
        }
    }
    out
}

/// Reference statistics for a raw measurement table, per item-index value
/// and value column. `rows` restricts the population (e.g. to an observable
/// window or a cohort); `None` uses the whole table.
pub fn reference_values_by_item(
    table: &Table,
    item_column: &str,
    value_columns: &[String],
    rows: Option<&[usize]>,
    z: f64,
) -> BTreeMap<String, BTreeMap<String, ReferenceInterval>> {
    let rows: Vec<usize> = match rows {
        Some(rows) => rows.to_vec(),
        None => (0..table.n_rows()).collect(),
    };

    let mut out: BTreeMap<String, BTreeMap<String, ReferenceInterval>> = BTreeMap::new();
    let mut samples: BTreeMap<(String, &str), Vec<f64>> = BTreeMap::new();
    for &row in &rows {
        let Some(item) = table.key_at(row, item_column) else {
            continue;
        };
        for column in value_columns {
            if let Some(v) = table.value(row, column).and_then(Value::as_f64) {
                samples.entry((item.clone(), column)).or_default().push(v);
            }
        }
    }
    for ((item, column), values) in samples {
        if let Some(interval) = interval_of(&values, z) {
            out.entry(item).or_default().insert(column.to_string(), interval);
        }
    }
    out
}

fn interval_of(values: &[f64], z: f64) -> Option<ReferenceInterval> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    if !std.is_finite() || std == 0.0 {
        return None;
    }
    Some(ReferenceInterval::from_stats(mean, std, values.len(), z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sample_interval() {
        let interval = interval_of(&[8.0, 10.0, 12.0], 1.96).unwrap();
        assert_eq!(interval.mean, 10.0);
        assert_eq!(interval.std, 2.0);
        assert_eq!(interval.count, 3);
        assert_eq!(interval.high, 10.0 + 1.96 * 2.0);
        assert_eq!(interval.low, 10.0 - 1.96 * 2.0);
    }

    #[test]
    fn constant_and_tiny_samples_yield_no_interval() {
        assert_eq!(interval_of(&[5.0, 5.0, 5.0], 1.96), None);
        assert_eq!(interval_of(&[5.0], 1.96), None);
        assert_eq!(interval_of(&[], 1.96), None);
    }
}
