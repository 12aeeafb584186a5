//! # clinsight-graph
//!
//! In-memory entity graph (tables + parent/child relationships), the
//! process-wide snapshot registry, and breadth-first path resolution.

pub mod graph;
pub mod path;
pub mod registry;

pub use graph::{builder, EntityGraph, EntityNode};
pub use path::{resolve, HopDirection, PathHop, ResolvedPath};
pub use registry::GraphRegistry;
