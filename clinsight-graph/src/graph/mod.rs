//! Typed entity-graph registry: arena-indexed nodes, validated name lookups,
//! insertion-ordered relationship list.

pub mod builder;
mod entity_graph;

pub use entity_graph::{EntityGraph, EntityNode};
