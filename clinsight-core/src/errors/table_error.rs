/// Construction and access errors for in-memory tables and feature matrices.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("column '{column}' in table '{table}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },
}
