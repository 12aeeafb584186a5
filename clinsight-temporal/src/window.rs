use chrono::{DateTime, Utc};

use clinsight_core::table::Table;

/// Row indices of `table` observable at `cutoff`.
///
/// A table without a time index holds static facts, so every row is visible.
/// Rows whose time cell is null or mistyped are excluded: existence before
/// the cutoff cannot be established for them.
pub fn observable_rows(table: &Table, time_index: Option<&str>, cutoff: DateTime<Utc>) -> Vec<usize> {
    match time_index {
        None => (0..table.n_rows()).collect(),
        Some(column) => (0..table.n_rows())
            .filter(|&row| {
                table
                    .value(row, column)
                    .and_then(|v| v.as_timestamp())
                    .is_some_and(|t| t <= cutoff)
            })
            .collect(),
    }
}
