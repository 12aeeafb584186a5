//! Build a validated entity graph from the tabular-store collaborator.

use tracing::info;

use clinsight_core::errors::{ClinsightResult, GraphError};
use clinsight_core::traits::ITabularStore;

use super::EntityGraph;

/// Build the graph once per dataset load: every entity's declared index,
/// time-index, and item-index columns must exist in its table, and every
/// relationship key must exist on both sides.
pub fn build(store: &dyn ITabularStore) -> ClinsightResult<EntityGraph> {
    let mut graph = EntityGraph::new();

    for name in store.entity_names() {
        let schema = store.get_schema(&name)?;
        let table = store.get_table(&name)?;
        for column in schema_columns(&schema) {
            if !table.has_column(column) {
                return Err(GraphError::MissingKeyColumn {
                    entity: name.clone(),
                    column: column.to_string(),
                }
                .into());
            }
        }
        graph.add_entity(schema)?;
    }

    for spec in store.get_relationships()? {
        let parent_table = store.get_table(&spec.parent)?;
        if !parent_table.has_column(&spec.parent_key) {
            return Err(GraphError::MissingKeyColumn {
                entity: spec.parent.clone(),
                column: spec.parent_key.clone(),
            }
            .into());
        }
        let child_table = store.get_table(&spec.child)?;
        if !child_table.has_column(&spec.child_key) {
            return Err(GraphError::MissingKeyColumn {
                entity: spec.child.clone(),
                column: spec.child_key.clone(),
            }
            .into());
        }
        graph.add_relationship(spec)?;
    }

    graph.validate_connected()?;
    info!(
        entities = graph.n_entities(),
        relationships = graph.n_relationships(),
        "entity graph built"
    );
    Ok(graph)
}

fn schema_columns(schema: &clinsight_core::models::EntitySchema) -> Vec<&str> {
    let mut columns = vec![schema.index_column.as_str()];
    columns.extend(schema.time_index.as_deref());
    columns.extend(schema.item_index.as_deref());
    columns.extend(schema.value_columns.iter().map(String::as_str));
    columns.extend(schema.categorical_columns.iter().map(String::as_str));
    columns
}
