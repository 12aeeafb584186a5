//! Column-major in-memory tables with typed cells.
//!
//! The tabular store collaborator hands these to the core; the core never
//! mutates them after load.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TableError;

/// Declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
    Datetime,
    FreeText,
}

/// One cell of a table or feature matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Canonical string form used when a cell serves as an instance id or
    /// foreign-key value. Integral numbers render without a fraction so that
    /// numeric and text keys of the same id compare equal.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Number(v) if v.is_finite() && v.fract() == 0.0 => Some(format!("{}", *v as i64)),
            Value::Number(v) => Some(format!("{v}")),
            Value::Timestamp(t) => Some(t.to_rfc3339()),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }
}

/// A named relational table. Columns share one length; lookups go through a
/// validated name map rather than positional access.
///
/// Serializes for export only; rebuild through [`Table::new`] so the name map
/// stays consistent.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
    n_rows: usize,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, TableError> {
        let name = name.into();
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let mut by_name = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if col.values.len() != n_rows {
                return Err(TableError::ColumnLengthMismatch {
                    table: name,
                    column: col.name.clone(),
                    expected: n_rows,
                    actual: col.values.len(),
                });
            }
            if by_name.insert(col.name.clone(), i).is_some() {
                return Err(TableError::DuplicateColumn {
                    table: name,
                    column: col.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            by_name,
            n_rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.by_name.get(name).map(|&i| &self.columns[i])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Cell at `(row, column)`; `None` when either is out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Key-form of the cell at `(row, column)`, for index and foreign-key use.
    pub fn key_at(&self, row: usize, column: &str) -> Option<String> {
        self.value(row, column).and_then(Value::as_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(vals: &[f64]) -> Vec<Value> {
        vals.iter().map(|v| Value::Number(*v)).collect()
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let result = Table::new(
            "t",
            vec![
                Column::new("a", ColumnType::Numeric, numbers(&[1.0])),
                Column::new("a", ColumnType::Numeric, numbers(&[2.0])),
            ],
        );
        assert!(matches!(result, Err(TableError::DuplicateColumn { .. })));
    }

    #[test]
    fn rejects_ragged_columns() {
        let result = Table::new(
            "t",
            vec![
                Column::new("a", ColumnType::Numeric, numbers(&[1.0, 2.0])),
                Column::new("b", ColumnType::Numeric, numbers(&[1.0])),
            ],
        );
        assert!(matches!(
            result,
            Err(TableError::ColumnLengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn integral_numeric_keys_match_text_keys() {
        assert_eq!(Value::Number(42.0).as_key().as_deref(), Some("42"));
        assert_eq!(Value::Text("42".into()).as_key().as_deref(), Some("42"));
        assert_eq!(Value::Null.as_key(), None);
    }
}
