/// Counterfactual explanation errors.
#[derive(Debug, thiserror::Error)]
pub enum ExplanationError {
    #[error("instance '{instance_id}' not present in the feature matrix")]
    UnknownInstance { instance_id: String },

    #[error("attribution length {actual} does not match feature count {expected}")]
    AttributionMisaligned { expected: usize, actual: usize },
}
