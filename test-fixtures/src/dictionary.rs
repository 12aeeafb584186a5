use std::collections::HashMap;

use clinsight_core::traits::IItemDictionary;

/// An [`IItemDictionary`] backed by a plain map.
#[derive(Default)]
pub struct StaticItemDictionary {
    labels: HashMap<(String, String), String>,
}

impl StaticItemDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        entity: impl Into<String>,
        item_code: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.labels
            .insert((entity.into(), item_code.into()), label.into());
    }
}

impl IItemDictionary for StaticItemDictionary {
    fn lookup(&self, entity: &str, item_code: &str) -> Option<String> {
        self.labels
            .get(&(entity.to_string(), item_code.to_string()))
            .cloned()
    }
}
