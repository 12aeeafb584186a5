use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Directed;

use clinsight_core::errors::GraphError;
use clinsight_core::models::{EntitySchema, RelationshipSpec};

/// One entity in the graph arena.
#[derive(Debug, Clone)]
pub struct EntityNode {
    pub name: String,
    pub schema: EntitySchema,
}

/// The relational entity graph.
///
/// Edges point parent -> child. Traversal treats them as undirected; the
/// direction only decides the child side during cutoff-time propagation.
/// Invariants enforced at insertion: unique entity names, at most one
/// relationship per entity pair, no cycles through distinct entities.
#[derive(Debug, Default)]
pub struct EntityGraph {
    pub graph: StableGraph<EntityNode, RelationshipSpec, Directed>,
    node_index: HashMap<String, NodeIndex>,
    entity_order: Vec<String>,
    relationship_order: Vec<EdgeIndex>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_entities(&self) -> usize {
        self.entity_order.len()
    }

    pub fn n_relationships(&self) -> usize {
        self.relationship_order.len()
    }

    pub fn get_node(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn schema(&self, name: &str) -> Option<&EntitySchema> {
        self.get_node(name).map(|idx| &self.graph[idx].schema)
    }

    /// Entity names in insertion order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entity_order.iter().map(String::as_str)
    }

    /// Relationships in insertion order. This order breaks BFS ties, so it
    /// must stay deterministic.
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipSpec> {
        self.relationship_order
            .iter()
            .filter_map(|&e| self.graph.edge_weight(e))
    }

    pub fn add_entity(&mut self, schema: EntitySchema) -> Result<NodeIndex, GraphError> {
        let name = schema.name.clone();
        if self.node_index.contains_key(&name) {
            return Err(GraphError::DuplicateEntity { name });
        }
        let idx = self.graph.add_node(EntityNode {
            name: name.clone(),
            schema,
        });
        self.node_index.insert(name.clone(), idx);
        self.entity_order.push(name);
        Ok(idx)
    }

    pub fn add_relationship(&mut self, spec: RelationshipSpec) -> Result<EdgeIndex, GraphError> {
        let parent_idx = self
            .get_node(&spec.parent)
            .ok_or_else(|| GraphError::UnknownEntity {
                name: spec.parent.clone(),
            })?;
        let child_idx = self
            .get_node(&spec.child)
            .ok_or_else(|| GraphError::UnknownEntity {
                name: spec.child.clone(),
            })?;

        if parent_idx == child_idx {
            return Err(GraphError::RelationshipCycle {
                parent: spec.parent,
                child: spec.child,
            });
        }

        // Multiple relationships between one pair are ambiguous for
        // cutoff-time propagation; a configuration error, never a guess.
        let existing = self
            .relationships()
            .filter(|r| r.touches(&spec.parent, &spec.child))
            .count();
        if existing > 0 {
            return Err(GraphError::AmbiguousRelationship {
                parent: spec.parent,
                child: spec.child,
                count: existing + 1,
            });
        }

        // An undirected path between the endpoints already existing means
        // this edge would close a cycle through intermediate entities.
        if self.connected_undirected(parent_idx, child_idx) {
            return Err(GraphError::RelationshipCycle {
                parent: spec.parent,
                child: spec.child,
            });
        }

        let edge = self.graph.add_edge(parent_idx, child_idx, spec);
        self.relationship_order.push(edge);
        Ok(edge)
    }

    /// The single relationship between two entities, in either direction.
    pub fn relationship_between(&self, a: &str, b: &str) -> Option<&RelationshipSpec> {
        self.relationships().find(|r| r.touches(a, b))
    }

    /// Undirected neighbors of `entity`, in relationship insertion order.
    pub fn neighbors_in_order(&self, entity: &str) -> Vec<&str> {
        self.relationships()
            .filter_map(|r| r.other_end(entity))
            .collect()
    }

    fn connected_undirected(&self, from: NodeIndex, to: NodeIndex) -> bool {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue = VecDeque::from([from]);
        seen.insert(from);
        while let Some(node) = queue.pop_front() {
            if node == to {
                return true;
            }
            for neighbor in self.graph.neighbors_undirected(node) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        false
    }

    /// Every entity must be reachable (undirected) from the first-declared
    /// one; violated graphs cannot satisfy path resolution.
    pub fn validate_connected(&self) -> Result<(), GraphError> {
        let Some(root_name) = self.entity_order.first() else {
            return Ok(());
        };
        let root = self.node_index[root_name];
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue = VecDeque::from([root]);
        seen.insert(root);
        while let Some(node) = queue.pop_front() {
            for neighbor in self.graph.neighbors_undirected(node) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        let unreached: Vec<String> = self
            .entity_order
            .iter()
            .filter(|name| !seen.contains(&self.node_index[*name]))
            .cloned()
            .collect();
        if unreached.is_empty() {
            Ok(())
        } else {
            Err(GraphError::Disconnected {
                root: root_name.clone(),
                unreached,
            })
        }
    }
}
