use std::sync::Arc;

use crate::errors::ClinsightResult;
use crate::models::{EntitySchema, RelationshipSpec};
use crate::table::Table;

/// Read access to an already-loaded relational dataset.
///
/// Ingestion, persistence, and schema configuration live behind this trait;
/// the core never touches raw files.
pub trait ITabularStore: Send + Sync {
    /// All entity names, in a stable order.
    fn entity_names(&self) -> Vec<String>;

    /// Rows and typed columns of one entity.
    fn get_table(&self, entity: &str) -> ClinsightResult<Arc<Table>>;

    /// Index/time-index/item-index designations of one entity.
    fn get_schema(&self, entity: &str) -> ClinsightResult<EntitySchema>;

    /// All parent–child links, in declaration order.
    fn get_relationships(&self) -> ClinsightResult<Vec<RelationshipSpec>>;
}
