//! The outward-facing feature generation pipeline.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use clinsight_core::cancel::CancelToken;
use clinsight_core::config::FeaturizationConfig;
use clinsight_core::errors::{ClinsightResult, FeaturizationError};
use clinsight_core::matrix::FeatureMatrix;
use clinsight_core::models::{CutoffTimes, Feature, FeatureDescriptor};
use clinsight_core::traits::{IItemDictionary, ITabularStore};
use clinsight_graph::EntityGraph;

use crate::describe::describe;
use crate::generate::{generate_for_source, SourceSpec};
use crate::merge::{merge_sources, remove_uninterpretable};
use crate::select::{select_features, SelectionPreset};

/// Everything one generation request produces.
#[derive(Debug)]
pub struct GeneratedFeatures {
    pub matrix: FeatureMatrix,
    pub features: Vec<Feature>,
    pub descriptors: Vec<FeatureDescriptor>,
}

/// Runs the full pipeline: per-source generation in parallel, deterministic
/// merge in request order, redundancy pruning, selection, description.
///
/// Any per-source failure or cancellation discards the whole request; no
/// partially merged matrix ever escapes.
pub struct FeaturizationEngine {
    store: Arc<dyn ITabularStore>,
    graph: Arc<EntityGraph>,
    item_dictionary: Option<Arc<dyn IItemDictionary>>,
    config: FeaturizationConfig,
}

impl FeaturizationEngine {
    pub fn new(
        store: Arc<dyn ITabularStore>,
        graph: Arc<EntityGraph>,
        config: FeaturizationConfig,
    ) -> Self {
        Self {
            store,
            graph,
            item_dictionary: None,
            config,
        }
    }

    pub fn with_item_dictionary(mut self, dictionary: Arc<dyn IItemDictionary>) -> Self {
        self.item_dictionary = Some(dictionary);
        self
    }

    pub fn generate_features(
        &self,
        target_entity: &str,
        sources: &[SourceSpec],
        cutoff_times: &CutoffTimes,
        preset: SelectionPreset,
        cancel: &CancelToken,
    ) -> ClinsightResult<GeneratedFeatures> {
        if sources.is_empty() {
            return Err(FeaturizationError::EmptySourceList.into());
        }
        cancel.check()?;
        info!(
            target = target_entity,
            sources = sources.len(),
            instances = cutoff_times.len(),
            "feature generation started"
        );

        // Sources are independent; collect preserves request order so the
        // merge below never depends on which worker finished first.
        let results: Vec<ClinsightResult<_>> = sources
            .par_iter()
            .map(|spec| {
                generate_for_source(
                    self.store.as_ref(),
                    &self.graph,
                    target_entity,
                    spec,
                    cutoff_times,
                    &self.config,
                    cancel,
                )
            })
            .collect();
        let mut per_source = Vec::with_capacity(results.len());
        for result in results {
            per_source.push(result?);
        }
        cancel.check()?;

        let (mut matrix, mut features) = merge_sources(cutoff_times.ids(), per_source)?;
        remove_uninterpretable(&mut matrix, &mut features);
        select_features(&mut matrix, &mut features, preset, &self.config);

        let mut descriptors = Vec::with_capacity(features.len());
        for feature in &features {
            let entity = feature.owning_entity()?.to_string();
            let schema = self.store.get_schema(&entity)?;
            descriptors.push(describe(feature, &schema, self.item_dictionary.as_deref())?);
        }

        info!(features = matrix.n_cols(), "feature generation finished");
        Ok(GeneratedFeatures {
            matrix,
            features,
            descriptors,
        })
    }
}
