//! Per-source feature generation.
//!
//! A source entity is linked to each target instance by walking the resolved
//! path hop by hop. Pure child -> parent paths link each instance to at most
//! one row per entity, so the source's declared columns become direct
//! features; any parent -> child hop fans out to many rows, so the source's
//! value columns become aggregations over the instance's observable window.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use clinsight_core::cancel::CancelToken;
use clinsight_core::config::FeaturizationConfig;
use clinsight_core::errors::{ClinsightError, ClinsightResult, FeaturizationError, GraphError};
use clinsight_core::models::{AggregationKind, CutoffTimes, EntitySchema, Feature};
use clinsight_core::table::{Table, Value};
use clinsight_core::traits::ITabularStore;
use clinsight_graph::{resolve, EntityGraph, HopDirection, ResolvedPath};
use clinsight_temporal::{propagate_cutoff_times, Reduction};

use crate::primitive;

/// One requested source entity and the primitives to compute over it.
///
/// `where_aggregations` are the kinds additionally computed once per distinct
/// item-index value; they default to the plain aggregation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub entity: String,
    pub aggregations: Vec<AggregationKind>,
    pub where_aggregations: Vec<AggregationKind>,
}

impl SourceSpec {
    pub fn new(entity: impl Into<String>, aggregations: Vec<AggregationKind>) -> Self {
        Self {
            entity: entity.into(),
            where_aggregations: aggregations.clone(),
            aggregations,
        }
    }
}

/// Compute all features for one source entity, aligned with the iteration
/// order of `cutoff_times`.
pub fn generate_for_source(
    store: &dyn ITabularStore,
    graph: &EntityGraph,
    target_entity: &str,
    spec: &SourceSpec,
    cutoff_times: &CutoffTimes,
    config: &FeaturizationConfig,
    cancel: &CancelToken,
) -> ClinsightResult<Vec<(Feature, Vec<Value>)>> {
    cancel.check()?;

    let path = match resolve(graph, target_entity, &spec.entity) {
        Ok(path) => path,
        Err(ClinsightError::Graph(GraphError::NoPath { .. }))
        | Err(ClinsightError::Graph(GraphError::UnknownEntity { .. })) => {
            return Err(FeaturizationError::UnreachableEntity {
                entity: spec.entity.clone(),
                target: target_entity.to_string(),
            }
            .into())
        }
        Err(e) => return Err(e),
    };
    if path.n_hops() > config.max_depth {
        return Err(FeaturizationError::PathTooDeep {
            entity: spec.entity.clone(),
            target: target_entity.to_string(),
            depth: path.n_hops(),
            max_depth: config.max_depth,
        }
        .into());
    }

    let schema = store.get_schema(&spec.entity)?;
    let table = store.get_table(&spec.entity)?;
    let instance_ids = cutoff_times.ids();
    let links = link_rows(store, &path, &instance_ids)?;

    let features = if path.has_fan_out() {
        aggregated_features(
            store,
            spec,
            &schema,
            &table,
            &path,
            cutoff_times,
            &links,
            config,
            cancel,
        )?
    } else {
        direct_features(&schema, &table, &links)
    };
    debug!(
        source = %spec.entity,
        target = target_entity,
        hops = path.n_hops(),
        features = features.len(),
        "source features generated"
    );
    Ok(features)
}

/// Row positions of `column`'s key values, for joining.
fn rows_by_key(table: &Table, column: &str) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for row in 0..table.n_rows() {
        if let Some(key) = table.key_at(row, column) {
            index.entry(key).or_default().push(row);
        }
    }
    index
}

/// For each target instance, the row positions it reaches in the path's last
/// entity. Instances linked to nothing get an empty row set.
fn link_rows(
    store: &dyn ITabularStore,
    path: &ResolvedPath,
    instance_ids: &[String],
) -> ClinsightResult<Vec<Vec<usize>>> {
    let first_schema = store.get_schema(path.source())?;
    let first_table = store.get_table(path.source())?;
    let by_index = rows_by_key(&first_table, &first_schema.index_column);

    let mut current: Vec<Vec<usize>> = instance_ids
        .iter()
        .map(|id| by_index.get(id).cloned().unwrap_or_default())
        .collect();
    let mut current_table = first_table;

    for hop in &path.hops {
        let next_table = store.get_table(&hop.target)?;
        let (out_key, in_key) = match hop.direction {
            HopDirection::ParentToChild => {
                (&hop.relationship.parent_key, &hop.relationship.child_key)
            }
            HopDirection::ChildToParent => {
                (&hop.relationship.child_key, &hop.relationship.parent_key)
            }
        };
        let next_by_key = rows_by_key(&next_table, in_key);
        current = current
            .iter()
            .map(|rows| {
                let mut next_rows: BTreeSet<usize> = BTreeSet::new();
                for &row in rows {
                    if let Some(key) = current_table.key_at(row, out_key) {
                        if let Some(matches) = next_by_key.get(&key) {
                            next_rows.extend(matches);
                        }
                    }
                }
                next_rows.into_iter().collect()
            })
            .collect();
        current_table = next_table;
    }
    Ok(current)
}

/// One-row-per-instance paths: copy the source's declared columns verbatim.
fn direct_features(
    schema: &EntitySchema,
    table: &Table,
    links: &[Vec<usize>],
) -> Vec<(Feature, Vec<Value>)> {
    let columns = schema
        .value_columns
        .iter()
        .chain(schema.categorical_columns.iter());

    let mut out = Vec::new();
    for column in columns {
        let feature = Feature::direct(&schema.name, column);
        let values = links
            .iter()
            .map(|rows| {
                rows.first()
                    .and_then(|&row| table.value(row, column))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();
        out.push((feature, values));
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn aggregated_features(
    store: &dyn ITabularStore,
    spec: &SourceSpec,
    schema: &EntitySchema,
    table: &Table,
    path: &ResolvedPath,
    cutoff_times: &CutoffTimes,
    links: &[Vec<usize>],
    config: &FeaturizationConfig,
    cancel: &CancelToken,
) -> ClinsightResult<Vec<(Feature, Vec<Value>)>> {
    let propagated = propagate_cutoff_times(store, cutoff_times, path, Reduction::Latest)?;

    // Rows visible to each instance: linked, known to the propagated cutoff
    // map, and timestamped at or before the instance's own cutoff. On paths
    // that climb to a shared ancestor and fan back out, the reduced row-level
    // cutoff is the latest over sibling instances, so it alone would let an
    // earlier instance see rows past its cutoff; the tighter of the two
    // bounds applies.
    let observable: Vec<Vec<usize>> = cutoff_times
        .iter()
        .zip(links.iter())
        .map(|((_, instance_cutoff), rows)| {
            rows.iter()
                .copied()
                .filter(|&row| is_observable(table, schema, &propagated, row, instance_cutoff))
                .collect()
        })
        .collect();

    let mut out = Vec::new();
    for column in &schema.value_columns {
        for &kind in &spec.aggregations {
            cancel.check()?;
            let feature = named_aggregate(kind, schema, column, None);
            let values = observable
                .iter()
                .map(|rows| compute(kind, table, schema, column, rows, None))
                .collect();
            out.push((feature, values));
        }
    }

    if let Some(item_column) = &schema.item_index {
        if !spec.where_aggregations.is_empty() {
            let items = ranked_items(table, item_column, config.max_features);
            for item in &items {
                for column in &schema.value_columns {
                    for &kind in &spec.where_aggregations {
                        cancel.check()?;
                        let filter = Some((item_column.as_str(), item.as_str()));
                        let feature = named_aggregate(kind, schema, column, filter);
                        let values = observable
                            .iter()
                            .map(|rows| compute(kind, table, schema, column, rows, filter))
                            .collect();
                        out.push((feature, values));
                    }
                }
            }
        }
    }
    Ok(out)
}

fn named_aggregate(
    kind: AggregationKind,
    schema: &EntitySchema,
    column: &str,
    filter: Option<(&str, &str)>,
) -> Feature {
    // Only trend carries the time index as an extra base leaf.
    let time_column = match kind {
        AggregationKind::Trend => schema.time_index.as_deref(),
        _ => None,
    };
    match filter {
        None => Feature::aggregate(kind, &schema.name, column, time_column),
        Some((item_column, item_value)) => Feature::filtered(
            kind,
            &schema.name,
            column,
            time_column,
            item_column,
            item_value,
        ),
    }
}

fn is_observable(
    table: &Table,
    schema: &EntitySchema,
    propagated: &CutoffTimes,
    row: usize,
    instance_cutoff: DateTime<Utc>,
) -> bool {
    let Some(id) = table.key_at(row, &schema.index_column) else {
        return false;
    };
    let Some(row_cutoff) = propagated.get(&id) else {
        return false;
    };
    match &schema.time_index {
        None => true,
        Some(column) => table
            .value(row, column)
            .and_then(Value::as_timestamp)
            .is_some_and(|t| t <= row_cutoff.min(instance_cutoff)),
    }
}

/// Distinct item-index values ranked by descending frequency over the whole
/// table, item id ascending on ties, truncated to `max_items`.
fn ranked_items(table: &Table, item_column: &str, max_items: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..table.n_rows() {
        if let Some(item) = table.key_at(row, item_column) {
            *counts.entry(item).or_default() += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_items);
    ranked.into_iter().map(|(item, _)| item).collect()
}

/// Apply one primitive over an instance's observable rows, optionally
/// restricted to one item-index value.
fn compute(
    kind: AggregationKind,
    table: &Table,
    schema: &EntitySchema,
    column: &str,
    rows: &[usize],
    filter: Option<(&str, &str)>,
) -> Value {
    let mut values = Vec::new();
    let mut times = Vec::new();
    for &row in rows {
        if let Some((item_column, item_value)) = filter {
            if table.key_at(row, item_column).as_deref() != Some(item_value) {
                continue;
            }
        }
        let Some(v) = table.value(row, column).and_then(Value::as_f64) else {
            continue;
        };
        if let Some(time_column) = &schema.time_index {
            if let Some(t) = table.value(row, time_column).and_then(Value::as_timestamp) {
                times.push(t);
            }
        }
        values.push(v);
    }
    primitive::apply(kind, &values, &times)
}
