use serde::{Deserialize, Serialize};

/// The item-index filter behind a WHERE feature, with its display alias when
/// an item-label dictionary resolved one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    pub column: String,
    pub value: String,
    pub alias: Option<String>,
}

/// Structured description of one computed feature, shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Canonical feature name (matrix column name).
    pub id: String,
    /// Aggregation label, `None` for direct attribute features.
    pub primitive: Option<String>,
    /// Owning entity.
    pub entity: String,
    /// Base leaf column, `None` only on synthetic group nodes.
    pub column: Option<String>,
    /// WHERE filter, if any.
    pub item: Option<ItemRef>,
    /// Short display alias.
    pub alias: String,
    /// Human-readable description.
    pub description: String,
}
