//! Feature matrix: one row per target instance, one column per feature.
//!
//! Immutable after generation except for in-place column pruning performed by
//! the feature-selection pass.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::TableError;
use crate::table::Value;

const MATRIX_NAME: &str = "feature_matrix";

/// A named feature column, aligned with the matrix row index.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<Value>,
}

/// Feature matrix keyed by target-entity instance id.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureMatrix {
    index: Vec<String>,
    #[serde(skip)]
    row_of: HashMap<String, usize>,
    columns: Vec<FeatureColumn>,
    #[serde(skip)]
    col_of: HashMap<String, usize>,
}

impl FeatureMatrix {
    /// Create an empty matrix over the given instance index.
    pub fn new(index: Vec<String>) -> Self {
        let row_of = index
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            index,
            row_of,
            columns: Vec::new(),
            col_of: HashMap::new(),
        }
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn contains_instance(&self, instance_id: &str) -> bool {
        self.row_of.contains_key(instance_id)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.col_of.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.col_of.get(name).map(|&i| &self.columns[i])
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Append a column aligned with the row index.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TableError::ColumnLengthMismatch {
                table: MATRIX_NAME.to_string(),
                column: name,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        if self.col_of.contains_key(&name) {
            return Err(TableError::DuplicateColumn {
                table: MATRIX_NAME.to_string(),
                column: name,
            });
        }
        self.col_of.insert(name.clone(), self.columns.len());
        self.columns.push(FeatureColumn { name, values });
        Ok(())
    }

    /// Cell for `(instance, feature)`.
    pub fn get(&self, instance_id: &str, feature: &str) -> Option<&Value> {
        let row = *self.row_of.get(instance_id)?;
        self.column(feature).map(|c| &c.values[row])
    }

    /// Drop one column in place. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.col_of.remove(name) {
            Some(i) => {
                self.columns.remove(i);
                self.reindex_columns();
                true
            }
            None => false,
        }
    }

    /// Keep only columns for which `keep` returns true, preserving order.
    pub fn retain_columns<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.columns.retain(|c| keep(&c.name));
        self.reindex_columns();
    }

    fn reindex_columns(&mut self) {
        self.col_of = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
    }

    /// One instance's values across all columns, in column order.
    pub fn row(&self, instance_id: &str) -> Option<FeatureRow> {
        let row = *self.row_of.get(instance_id)?;
        Some(FeatureRow {
            instance_id: instance_id.to_string(),
            names: self.columns.iter().map(|c| c.name.clone()).collect(),
            values: self.columns.iter().map(|c| c.values[row].clone()).collect(),
        })
    }

    /// Positions of the given instance ids, skipping unknown ones.
    pub fn rows_for(&self, instance_ids: &[String]) -> Vec<usize> {
        instance_ids
            .iter()
            .filter_map(|id| self.row_of.get(id).copied())
            .collect()
    }
}

/// A single instance's named feature values — the unit handed to the
/// prediction collaborator, including perturbed copies.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub instance_id: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl FeatureRow {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.values[i])
    }

    /// Overwrite one value by feature name. Returns whether the name exists.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.position(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_matrix() -> FeatureMatrix {
        let mut fm = FeatureMatrix::new(vec!["a".into(), "b".into()]);
        fm.add_column("x", vec![Value::Number(1.0), Value::Number(2.0)])
            .unwrap();
        fm.add_column("y", vec![Value::Null, Value::Text("t".into())])
            .unwrap();
        fm
    }

    #[test]
    fn add_column_rejects_misaligned_lengths() {
        let mut fm = FeatureMatrix::new(vec!["a".into()]);
        let err = fm.add_column("x", vec![]).unwrap_err();
        assert!(matches!(err, TableError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn add_column_rejects_duplicates() {
        let mut fm = small_matrix();
        let err = fm
            .add_column("x", vec![Value::Null, Value::Null])
            .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn drop_column_reindexes_lookups() {
        let mut fm = small_matrix();
        assert!(fm.drop_column("x"));
        assert!(!fm.contains_column("x"));
        assert_eq!(fm.get("b", "y"), Some(&Value::Text("t".into())));
    }

    #[test]
    fn row_round_trips_values_in_column_order() {
        let fm = small_matrix();
        let row = fm.row("b").unwrap();
        assert_eq!(row.names(), &["x".to_string(), "y".to_string()]);
        assert_eq!(row.get("x"), Some(&Value::Number(2.0)));

        let mut perturbed = row.clone();
        assert!(perturbed.set("x", Value::Number(9.0)));
        assert_eq!(perturbed.get("x"), Some(&Value::Number(9.0)));
        // The original row is untouched.
        assert_eq!(row.get("x"), Some(&Value::Number(2.0)));
    }
}
