//! # clinsight-featurization
//!
//! Turns the relational entity graph into a flat feature matrix: per-source
//! generation restricted to each instance's observable window, deterministic
//! merge across sources, redundancy pruning, threshold-based selection, and
//! the descriptor/hierarchy layer consumed by display surfaces.

pub mod describe;
pub mod engine;
pub mod generate;
pub mod hierarchy;
pub mod merge;
pub mod primitive;
pub mod select;

pub use describe::describe;
pub use engine::{FeaturizationEngine, GeneratedFeatures};
pub use generate::{generate_for_source, SourceSpec};
pub use hierarchy::{build_hierarchy, group_by_entity, group_by_filter_item, FeatureNode};
pub use merge::{merge_sources, remove_uninterpretable};
pub use select::{select_features, SelectionPreset};
