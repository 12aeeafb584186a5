//! Hop-by-hop cutoff propagation.
//!
//! Cutoff times start keyed by the path's source entity and are re-keyed at
//! every hop: broadcast down parent -> child edges, reduced up child -> parent
//! edges. Instances with no related row at some hop simply drop out of the
//! result; absence from the output means "no observable data", not an error.

use tracing::debug;

use clinsight_core::errors::{ClinsightResult, TemporalError};
use clinsight_core::models::{CutoffTimes, RelationshipSpec};
use clinsight_core::traits::ITabularStore;
use clinsight_graph::{HopDirection, ResolvedPath};

use crate::reduction::Reduction;

/// Re-key `cutoff_times` from the path's source entity to its target entity.
///
/// `reduction` only applies on child -> parent hops, where several children
/// fold into one parent cutoff.
pub fn propagate_cutoff_times(
    store: &dyn ITabularStore,
    cutoff_times: &CutoffTimes,
    path: &ResolvedPath,
    reduction: Reduction,
) -> ClinsightResult<CutoffTimes> {
    if path.entities.is_empty() {
        return Err(TemporalError::EmptyPath.into());
    }

    let mut current = cutoff_times.clone();
    for hop in &path.hops {
        current = match hop.direction {
            HopDirection::ParentToChild => {
                broadcast_to_children(store, &hop.relationship, &current)?
            }
            HopDirection::ChildToParent => {
                reduce_to_parent(store, &hop.relationship, &current, reduction)?
            }
        };
        debug!(
            source = %hop.source,
            target = %hop.target,
            instances = current.len(),
            "propagated cutoff times across hop"
        );
    }
    Ok(current)
}

/// Every child row inherits its parent's cutoff time verbatim.
fn broadcast_to_children(
    store: &dyn ITabularStore,
    relationship: &RelationshipSpec,
    cutoff_times: &CutoffTimes,
) -> ClinsightResult<CutoffTimes> {
    let table = store.get_table(&relationship.child)?;
    let schema = store.get_schema(&relationship.child)?;

    let mut out = CutoffTimes::new();
    for row in 0..table.n_rows() {
        let Some(parent_ref) = table.key_at(row, &relationship.child_key) else {
            continue;
        };
        let Some(time) = cutoff_times.get(&parent_ref) else {
            continue;
        };
        let Some(child_id) = table.key_at(row, &schema.index_column) else {
            continue;
        };
        out.insert(child_id, time);
    }
    Ok(out)
}

/// Children sharing a parent fold into one cutoff per the reduction.
fn reduce_to_parent(
    store: &dyn ITabularStore,
    relationship: &RelationshipSpec,
    cutoff_times: &CutoffTimes,
    reduction: Reduction,
) -> ClinsightResult<CutoffTimes> {
    let table = store.get_table(&relationship.child)?;
    let schema = store.get_schema(&relationship.child)?;

    let mut out = CutoffTimes::new();
    for row in 0..table.n_rows() {
        let Some(child_id) = table.key_at(row, &schema.index_column) else {
            continue;
        };
        let Some(time) = cutoff_times.get(&child_id) else {
            continue;
        };
        let Some(parent_id) = table.key_at(row, &relationship.child_key) else {
            continue;
        };
        let combined = match out.get(&parent_id) {
            Some(existing) => reduction.combine(existing, time),
            None => time,
        };
        out.insert(parent_id, combined);
    }
    Ok(out)
}
