//! One-feature-at-a-time counterfactual re-scoring.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use clinsight_core::cancel::CancelToken;
use clinsight_core::config::ExplanationConfig;
use clinsight_core::errors::{ClinsightError, ClinsightResult, ExplanationError};
use clinsight_core::matrix::{FeatureMatrix, FeatureRow};
use clinsight_core::models::WhatIfOutcome;
use clinsight_core::table::Value;
use clinsight_core::traits::IPredictor;

/// For one instance, clamps each out-of-range numeric feature to the nearest
/// reference-interval boundary and asks the prediction collaborator to
/// re-score the perturbed row.
///
/// Features are perturbed independently, never jointly. A failing model call
/// drops that feature from the output without aborting its siblings;
/// cancellation discards the whole batch.
pub struct CounterfactualEngine {
    model: Arc<dyn IPredictor>,
    config: ExplanationConfig,
}

impl CounterfactualEngine {
    pub fn new(model: Arc<dyn IPredictor>, config: ExplanationConfig) -> Self {
        Self { model, config }
    }

    /// Explain one instance against the full matrix population, or against a
    /// caller-selected cohort. Output is keyed by feature name and restricted
    /// to out-of-range features; in-range features are omitted entirely.
    pub fn explain(
        &self,
        instance_id: &str,
        matrix: &FeatureMatrix,
        cohort: Option<&[String]>,
        cancel: &CancelToken,
    ) -> ClinsightResult<BTreeMap<String, WhatIfOutcome>> {
        let row = matrix
            .row(instance_id)
            .ok_or_else(|| ExplanationError::UnknownInstance {
                instance_id: instance_id.to_string(),
            })?;
        let intervals =
            crate::reference::reference_intervals(matrix, cohort, self.config.reference_z);

        // (column position, clamp boundary) per out-of-range numeric feature.
        let perturbations: Vec<(usize, f64)> = row
            .names()
            .iter()
            .zip(row.values())
            .enumerate()
            .filter_map(|(position, (name, value))| {
                let v = value.as_f64()?;
                let interval = intervals.get(name)?;
                if v > interval.high {
                    Some((position, interval.high))
                } else if v < interval.low {
                    Some((position, interval.low))
                } else {
                    None
                }
            })
            .collect();

        let mut out = BTreeMap::new();
        let chunk_size = self.config.max_concurrent_calls.max(1);
        for chunk in perturbations.chunks(chunk_size) {
            cancel.check()?;
            let results: Vec<(usize, ClinsightResult<WhatIfOutcome>)> = chunk
                .par_iter()
                .map(|&(position, boundary)| (position, self.rescore(&row, position, boundary)))
                .collect();
            for (position, result) in results {
                let name = &row.names()[position];
                match result {
                    Ok(outcome) => {
                        out.insert(name.clone(), outcome);
                    }
                    Err(ClinsightError::Cancelled) => return Err(ClinsightError::Cancelled),
                    Err(e) => {
                        warn!(instance = instance_id, feature = %name, error = %e,
                            "perturbation call failed, feature omitted");
                    }
                }
            }
        }
        info!(
            instance = instance_id,
            flagged = perturbations.len(),
            explained = out.len(),
            "counterfactual explanation finished"
        );
        Ok(out)
    }

    fn rescore(
        &self,
        row: &FeatureRow,
        position: usize,
        boundary: f64,
    ) -> ClinsightResult<WhatIfOutcome> {
        let name = row.names()[position].clone();
        let mut perturbed = row.clone();
        perturbed.set(&name, Value::Number(boundary));

        let prediction = self.model.predict_proba(&perturbed)?;
        let attributions = self.model.attribute(&perturbed)?;
        if attributions.len() != perturbed.names().len() {
            return Err(ExplanationError::AttributionMisaligned {
                expected: perturbed.names().len(),
                actual: attributions.len(),
            }
            .into());
        }
        Ok(WhatIfOutcome {
            attribution: attributions[position],
            prediction,
        })
    }
}
