use std::collections::HashMap;
use std::sync::Arc;

use clinsight_core::errors::{ClinsightResult, GraphError};
use clinsight_core::models::{EntitySchema, RelationshipSpec};
use clinsight_core::table::Table;
use clinsight_core::traits::ITabularStore;

/// An [`ITabularStore`] over tables built directly in test code.
#[derive(Default)]
pub struct InMemoryStore {
    tables: HashMap<String, Arc<Table>>,
    schemas: HashMap<String, EntitySchema>,
    order: Vec<String>,
    relationships: Vec<RelationshipSpec>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, schema: EntitySchema, table: Table) {
        self.order.push(schema.name.clone());
        self.tables.insert(schema.name.clone(), Arc::new(table));
        self.schemas.insert(schema.name.clone(), schema);
    }

    pub fn add_relationship(&mut self, relationship: RelationshipSpec) {
        self.relationships.push(relationship);
    }
}

impl ITabularStore for InMemoryStore {
    fn entity_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn get_table(&self, entity: &str) -> ClinsightResult<Arc<Table>> {
        self.tables
            .get(entity)
            .cloned()
            .ok_or_else(|| unknown(entity))
    }

    fn get_schema(&self, entity: &str) -> ClinsightResult<EntitySchema> {
        self.schemas
            .get(entity)
            .cloned()
            .ok_or_else(|| unknown(entity))
    }

    fn get_relationships(&self) -> ClinsightResult<Vec<RelationshipSpec>> {
        Ok(self.relationships.clone())
    }
}

fn unknown(entity: &str) -> clinsight_core::errors::ClinsightError {
    GraphError::UnknownEntity {
        name: entity.to_string(),
    }
    .into()
}
