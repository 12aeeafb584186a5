//! Shared model types consumed across the workspace.

mod cutoff;
mod descriptor;
mod feature;
mod reference;
mod schema;
mod what_if;

pub use cutoff::CutoffTimes;
pub use descriptor::{FeatureDescriptor, ItemRef};
pub use feature::{AggregationKind, Feature, FeatureExpr};
pub use reference::ReferenceInterval;
pub use schema::{EntitySchema, RelationshipSpec};
pub use what_if::WhatIfOutcome;
