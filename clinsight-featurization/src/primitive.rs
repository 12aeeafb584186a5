//! Aggregation primitives over one instance's observable samples.

use chrono::{DateTime, Utc};

use clinsight_core::models::AggregationKind;
use clinsight_core::table::Value;

/// Apply one primitive over aligned `(value, time)` samples.
///
/// `times` is only consulted by `Trend`; the other primitives ignore it.
/// Undefined results (empty input for `Mean`, fewer than two samples for
/// `Std`/`Trend`, zero time spread for `Trend`) come back as `Value::Null`.
/// `Count` is total on an empty window: zero observable rows is a real
/// feature value, not a missing one.
pub fn apply(kind: AggregationKind, values: &[f64], times: &[DateTime<Utc>]) -> Value {
    match kind {
        AggregationKind::Count => Value::Number(values.len() as f64),
        AggregationKind::Mean => match mean(values) {
            Some(m) => Value::Number(m),
            None => Value::Null,
        },
        AggregationKind::Std => match sample_std(values) {
            Some(s) => Value::Number(s),
            None => Value::Null,
        },
        AggregationKind::Trend => match trend(values, times) {
            Some(t) => Value::Number(t),
            None => Value::Null,
        },
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Least-squares slope of value against time, in value units per second.
fn trend(values: &[f64], times: &[DateTime<Utc>]) -> Option<f64> {
    if values.len() < 2 || values.len() != times.len() {
        return None;
    }
    let origin = times[0];
    let xs: Vec<f64> = times
        .iter()
        .map(|t| (*t - origin).num_milliseconds() as f64 / 1000.0)
        .collect();
    let x_mean = mean(&xs)?;
    let y_mean = mean(values)?;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in xs.iter().zip(values) {
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean).powi(2);
    }
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn mean_and_std_of_small_sample() {
        let values = [8.0, 10.0, 12.0];
        assert_eq!(
            apply(AggregationKind::Mean, &values, &[]),
            Value::Number(10.0)
        );
        assert_eq!(apply(AggregationKind::Std, &values, &[]), Value::Number(2.0));
    }

    #[test]
    fn count_is_zero_not_null_on_empty_window() {
        assert_eq!(apply(AggregationKind::Count, &[], &[]), Value::Number(0.0));
        assert_eq!(apply(AggregationKind::Mean, &[], &[]), Value::Null);
    }

    #[test]
    fn std_needs_two_samples() {
        assert_eq!(apply(AggregationKind::Std, &[5.0], &[]), Value::Null);
    }

    #[test]
    fn trend_recovers_a_linear_slope() {
        // 1.0 unit per hour = 1/3600 per second.
        let values = [1.0, 2.0, 3.0];
        let times = [at(0), at(1), at(2)];
        match apply(AggregationKind::Trend, &values, &times) {
            Value::Number(slope) => assert!((slope - 1.0 / 3600.0).abs() < 1e-12),
            other => panic!("expected a slope, got {other:?}"),
        }
    }

    #[test]
    fn trend_is_null_when_all_samples_share_a_timestamp() {
        let values = [1.0, 2.0];
        let times = [at(0), at(0)];
        assert_eq!(apply(AggregationKind::Trend, &values, &times), Value::Null);
    }
}
