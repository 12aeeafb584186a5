use serde::{Deserialize, Serialize};

/// Declared structure of one entity (relational table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity (table) name, unique within a dataset.
    pub name: String,
    /// Column holding the unique per-row instance id.
    pub index_column: String,
    /// Event timestamp column, when rows are timestamped.
    pub time_index: Option<String>,
    /// Column identifying the kind of measurement a row represents
    /// (e.g. a lab-test code); scopes filtered aggregations.
    pub item_index: Option<String>,
    /// Numeric measurement columns eligible as aggregation bases.
    pub value_columns: Vec<String>,
    /// Categorical attribute columns eligible as direct features.
    pub categorical_columns: Vec<String>,
}

/// A directed parent–child foreign-key link between two entities.
///
/// Walked in either direction for traversal; the child side determines
/// broadcast vs. reduce during cutoff-time propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSpec {
    pub parent: String,
    pub parent_key: String,
    pub child: String,
    pub child_key: String,
}

impl RelationshipSpec {
    pub fn new(
        parent: impl Into<String>,
        parent_key: impl Into<String>,
        child: impl Into<String>,
        child_key: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            parent_key: parent_key.into(),
            child: child.into(),
            child_key: child_key.into(),
        }
    }

    /// The endpoint opposite `entity`, if `entity` participates at all.
    pub fn other_end(&self, entity: &str) -> Option<&str> {
        if self.parent == entity {
            Some(&self.child)
        } else if self.child == entity {
            Some(&self.parent)
        } else {
            None
        }
    }

    pub fn touches(&self, a: &str, b: &str) -> bool {
        (self.parent == a && self.child == b) || (self.parent == b && self.child == a)
    }
}
