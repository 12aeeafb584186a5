//! Breadth-first path resolution between entities.
//!
//! Search expands level-by-level outward from the *target* entity over the
//! undirected relationship graph, so the first path that reaches the source
//! is shortest in hop count. Ties break on relationship insertion order.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use clinsight_core::errors::{ClinsightResult, GraphError};
use clinsight_core::models::RelationshipSpec;

use crate::graph::EntityGraph;

/// Direction of one hop, computed once at resolution time and carried with
/// the path instead of re-derived at each use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HopDirection {
    /// The hop's target side is the child: cutoff times broadcast.
    ParentToChild,
    /// The hop's source side is the child: cutoff times reduce.
    ChildToParent,
}

/// One relationship hop along a resolved path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathHop {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipSpec,
    pub direction: HopDirection,
}

/// An ordered traversal from source to target. `entities.len() == hops.len() + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub entities: Vec<String>,
    pub hops: Vec<PathHop>,
}

impl ResolvedPath {
    pub fn source(&self) -> &str {
        &self.entities[0]
    }

    pub fn target(&self) -> &str {
        &self.entities[self.entities.len() - 1]
    }

    pub fn n_hops(&self) -> usize {
        self.hops.len()
    }

    /// Whether any hop walks parent -> child (a one-to-many fan-out).
    pub fn has_fan_out(&self) -> bool {
        self.hops
            .iter()
            .any(|h| h.direction == HopDirection::ParentToChild)
    }
}

/// Find the shortest traversal from `source` to `target`.
///
/// `source == target` yields a single-element path with no hops. Unknown
/// entities and disconnected components fail with [`GraphError`].
pub fn resolve(graph: &EntityGraph, source: &str, target: &str) -> ClinsightResult<ResolvedPath> {
    for name in [source, target] {
        if !graph.contains_entity(name) {
            return Err(GraphError::UnknownEntity {
                name: name.to_string(),
            }
            .into());
        }
    }

    if source == target {
        return Ok(ResolvedPath {
            entities: vec![source.to_string()],
            hops: Vec::new(),
        });
    }

    // BFS parent pointers, discovered outward from the target.
    let mut bfs_parent: HashMap<&str, &str> = HashMap::new();
    bfs_parent.insert(target, target);
    let mut queue: VecDeque<&str> = VecDeque::from([target]);

    'search: while let Some(node) = queue.pop_front() {
        for neighbor in graph.neighbors_in_order(node) {
            if bfs_parent.contains_key(neighbor) {
                continue;
            }
            bfs_parent.insert(neighbor, node);
            if neighbor == source {
                break 'search;
            }
            queue.push_back(neighbor);
        }
    }

    if !bfs_parent.contains_key(source) {
        return Err(GraphError::NoPath {
            source_entity: source.to_string(),
            target_entity: target.to_string(),
        }
        .into());
    }

    // Walk parent pointers from the source back toward the target.
    let mut entities = vec![source.to_string()];
    let mut node = source;
    while node != target {
        node = bfs_parent[node];
        entities.push(node.to_string());
    }

    let mut hops = Vec::with_capacity(entities.len() - 1);
    for pair in entities.windows(2) {
        let (hop_source, hop_target) = (&pair[0], &pair[1]);
        let relationship = graph
            .relationship_between(hop_source, hop_target)
            .ok_or_else(|| GraphError::MissingRelationship {
                source_entity: hop_source.clone(),
                target_entity: hop_target.clone(),
            })?
            .clone();
        let direction = if relationship.child == *hop_target {
            HopDirection::ParentToChild
        } else {
            HopDirection::ChildToParent
        };
        hops.push(PathHop {
            source: hop_source.clone(),
            target: hop_target.clone(),
            relationship,
            direction,
        });
    }

    Ok(ResolvedPath { entities, hops })
}
