/// Cutoff-time propagation errors.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("unknown cutoff-time reduction '{value}' (expected 'latest' or 'earliest')")]
    InvalidReduction { value: String },

    #[error("cutoff propagation received a path with no entities")]
    EmptyPath,
}
