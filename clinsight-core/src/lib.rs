//! # clinsight-core
//!
//! Foundation crate for the Clinsight feature-generation and explanation
//! system. Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod errors;
pub mod matrix;
pub mod models;
pub mod table;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelToken;
pub use config::ClinsightConfig;
pub use errors::{ClinsightError, ClinsightResult};
pub use matrix::{FeatureMatrix, FeatureRow};
pub use models::{CutoffTimes, EntitySchema, Feature, FeatureDescriptor, RelationshipSpec};
pub use table::{Column, ColumnType, Table, Value};
