use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-instance cutoff times: only facts dated at or before an instance's
/// cutoff are visible when computing its features.
///
/// Ordered map so every consumer iterates instances deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutoffTimes {
    times: BTreeMap<String, DateTime<Utc>>,
}

impl CutoffTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instance_id: impl Into<String>, time: DateTime<Utc>) {
        self.times.insert(instance_id.into(), time);
    }

    pub fn get(&self, instance_id: &str) -> Option<DateTime<Utc>> {
        self.times.get(instance_id).copied()
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.times.contains_key(instance_id)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, DateTime<Utc>)> {
        self.times.iter().map(|(id, t)| (id, *t))
    }

    /// Instance ids in deterministic (sorted) order.
    pub fn ids(&self) -> Vec<String> {
        self.times.keys().cloned().collect()
    }
}

impl FromIterator<(String, DateTime<Utc>)> for CutoffTimes {
    fn from_iter<I: IntoIterator<Item = (String, DateTime<Utc>)>>(iter: I) -> Self {
        Self {
            times: iter.into_iter().collect(),
        }
    }
}
