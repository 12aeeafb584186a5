/// Entity graph and path resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    // `source` is reserved for the error cause, so the entity fields spell
    // out the `_entity` suffix.
    #[error("no path between '{source_entity}' and '{target_entity}'")]
    NoPath {
        source_entity: String,
        target_entity: String,
    },

    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("duplicate entity: {name}")]
    DuplicateEntity { name: String },

    #[error("no relationship between consecutive path entities '{source_entity}' and '{target_entity}'")]
    MissingRelationship {
        source_entity: String,
        target_entity: String,
    },

    #[error("{count} relationships between '{parent}' and '{child}'; at most one is supported")]
    AmbiguousRelationship {
        parent: String,
        child: String,
        count: usize,
    },

    #[error("relationship '{parent}' -> '{child}' would close a cycle in the entity graph")]
    RelationshipCycle { parent: String, child: String },

    #[error("entity graph is not connected: {unreached:?} unreachable from '{root}'")]
    Disconnected { root: String, unreached: Vec<String> },

    #[error("relationship key '{column}' missing from entity '{entity}'")]
    MissingKeyColumn { entity: String, column: String },
}
