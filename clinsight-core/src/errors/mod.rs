//! Error taxonomy, one enum per subsystem, aggregated into [`ClinsightError`].

mod explanation_error;
mod featurization_error;
mod graph_error;
mod table_error;
mod temporal_error;

pub use explanation_error::ExplanationError;
pub use featurization_error::FeaturizationError;
pub use graph_error::GraphError;
pub use table_error::TableError;
pub use temporal_error::TemporalError;

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ClinsightError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Featurization(#[from] FeaturizationError),

    #[error(transparent)]
    Explanation(#[from] ExplanationError),

    #[error("external collaborator failed during {operation}: {details}")]
    Collaborator { operation: String, details: String },

    #[error("operation cancelled before completion")]
    Cancelled,
}

pub type ClinsightResult<T> = Result<T, ClinsightError>;
