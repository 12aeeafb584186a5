use std::sync::Mutex;

use clinsight_core::errors::{ClinsightError, ClinsightResult};
use clinsight_core::matrix::FeatureRow;
use clinsight_core::table::Value;
use clinsight_core::traits::IPredictor;

type FailPredicate = Box<dyn Fn(&FeatureRow) -> bool + Send + Sync>;

/// An [`IPredictor`] with deterministic outputs that records every row it is
/// asked to score, so tests can assert exactly which perturbations reached
/// the model.
///
/// Prediction is a logistic over the sum of numeric feature values;
/// attribution is each numeric value scaled by 0.1 (0.0 for non-numeric).
#[derive(Default)]
pub struct ScriptedModel {
    received: Mutex<Vec<FeatureRow>>,
    fail_when: Option<FailPredicate>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model whose `predict_proba` fails for rows matching `predicate`.
    pub fn failing_when(predicate: impl Fn(&FeatureRow) -> bool + Send + Sync + 'static) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_when: Some(Box::new(predicate)),
        }
    }

    /// Every row scored so far, in call order.
    pub fn received(&self) -> Vec<FeatureRow> {
        self.received.lock().unwrap().clone()
    }
}

impl IPredictor for ScriptedModel {
    fn predict_proba(&self, row: &FeatureRow) -> ClinsightResult<f64> {
        if let Some(predicate) = &self.fail_when {
            if predicate(row) {
                return Err(ClinsightError::Collaborator {
                    operation: "predict_proba".to_string(),
                    details: "scripted failure".to_string(),
                });
            }
        }
        self.received.lock().unwrap().push(row.clone());
        let sum: f64 = row.values().iter().filter_map(Value::as_f64).sum();
        Ok(1.0 / (1.0 + (-0.01 * sum).exp()))
    }

    fn attribute(&self, row: &FeatureRow) -> ClinsightResult<Vec<f64>> {
        Ok(row
            .values()
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) * 0.1)
            .collect())
    }
}
