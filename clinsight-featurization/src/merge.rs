//! Merging per-source feature tables and pruning redundant columns.

use tracing::debug;

use clinsight_core::errors::ClinsightResult;
use clinsight_core::matrix::FeatureMatrix;
use clinsight_core::models::Feature;
use clinsight_core::table::Value;

/// Combine per-source feature tables into one matrix over `instance_ids`.
///
/// Sources are taken in request order; when two sources produce the same
/// feature name, the first-seen column wins and the duplicate is dropped,
/// never overwritten.
pub fn merge_sources(
    instance_ids: Vec<String>,
    per_source: Vec<Vec<(Feature, Vec<Value>)>>,
) -> ClinsightResult<(FeatureMatrix, Vec<Feature>)> {
    let mut matrix = FeatureMatrix::new(instance_ids);
    let mut features = Vec::new();
    for source in per_source {
        for (feature, values) in source {
            if matrix.contains_column(&feature.name) {
                debug!(feature = %feature.name, "duplicate feature name, keeping first-seen column");
                continue;
            }
            matrix.add_column(feature.name.clone(), values)?;
            features.push(feature);
        }
    }
    Ok((matrix, features))
}

/// Drop unfiltered features shadowed by a filtered sibling.
///
/// `MEAN(LABEVENTS.VALUENUM)` says nothing a per-item
/// `MEAN(LABEVENTS.VALUENUM) WHERE ITEMID = ...` family doesn't already say,
/// so whenever a filtered feature's name extends an unfiltered feature's
/// name, the unfiltered one is removed from both the matrix and the feature
/// list.
pub fn remove_uninterpretable(matrix: &mut FeatureMatrix, features: &mut Vec<Feature>) {
    let drop: Vec<String> = features
        .iter()
        .filter(|f| !f.is_filtered())
        .filter(|f| {
            let prefix = format!("{} WHERE ", f.name);
            features
                .iter()
                .any(|g| g.is_filtered() && g.name.starts_with(&prefix))
        })
        .map(|f| f.name.clone())
        .collect();

    for name in &drop {
        matrix.drop_column(name);
        debug!(feature = %name, "unfiltered feature shadowed by filtered variants, dropped");
    }
    features.retain(|f| !drop.contains(&f.name));
}
