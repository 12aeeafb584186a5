/// Feature generation pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum FeaturizationError {
    #[error("source entity '{entity}' is not reachable from target '{target}'")]
    UnreachableEntity { entity: String, target: String },

    #[error("feature '{feature}' references columns from multiple entities: {entities:?}")]
    MultiEntityFeature {
        feature: String,
        entities: Vec<String>,
    },

    #[error("feature '{feature}' has ambiguous base columns: {columns:?}")]
    AmbiguousBaseColumn {
        feature: String,
        columns: Vec<String>,
    },

    #[error("path from '{target}' to '{entity}' spans {depth} hops, above the configured maximum of {max_depth}")]
    PathTooDeep {
        entity: String,
        target: String,
        depth: usize,
        max_depth: usize,
    },

    #[error("feature generation requested with no source entities")]
    EmptySourceList,

    #[error("unknown selection preset '{value}' (expected 'default' or 'permissive')")]
    UnknownSelectionPreset { value: String },

    #[error("unknown aggregation kind '{value}'")]
    UnknownAggregation { value: String },
}
