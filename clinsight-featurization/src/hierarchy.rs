//! Display hierarchy over flat descriptor lists.
//!
//! Two nesting passes, both order-stable: same-item descriptors fold under a
//! synthetic group node labeled with the item's alias, then every top-level
//! node folds under a group node per owning entity. Rebuilding from the same
//! flat list always yields the same tree.

use std::collections::HashMap;

use serde::Serialize;

use clinsight_core::models::FeatureDescriptor;

/// One node of the display tree. Group nodes carry no descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureNode {
    pub label: String,
    pub descriptor: Option<FeatureDescriptor>,
    pub children: Vec<FeatureNode>,
}

impl FeatureNode {
    fn leaf(descriptor: FeatureDescriptor) -> Self {
        Self {
            label: descriptor.alias.clone(),
            descriptor: Some(descriptor),
            children: Vec::new(),
        }
    }

    fn group(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            descriptor: None,
            children: Vec::new(),
        }
    }

    /// Owning entity: the descriptor's, or the first descendant's for groups.
    fn entity(&self) -> Option<&str> {
        match &self.descriptor {
            Some(d) => Some(&d.entity),
            None => self.children.iter().find_map(FeatureNode::entity),
        }
    }
}

/// Nest descriptors sharing a filter item under one group node per
/// `(entity, item)` pair; unfiltered descriptors stay top-level. Order
/// follows first appearance in the input list.
pub fn group_by_filter_item(descriptors: &[FeatureDescriptor]) -> Vec<FeatureNode> {
    let mut nodes: Vec<FeatureNode> = Vec::new();
    let mut group_of: HashMap<(String, String), usize> = HashMap::new();

    for descriptor in descriptors {
        match &descriptor.item {
            None => nodes.push(FeatureNode::leaf(descriptor.clone())),
            Some(item) => {
                let key = (descriptor.entity.clone(), item.value.clone());
                let index = match group_of.get(&key) {
                    Some(&index) => index,
                    None => {
                        let label = item.alias.clone().unwrap_or_else(|| item.value.clone());
                        nodes.push(FeatureNode::group(label));
                        group_of.insert(key, nodes.len() - 1);
                        nodes.len() - 1
                    }
                };
                nodes[index].children.push(FeatureNode::leaf(descriptor.clone()));
            }
        }
    }
    nodes
}

/// Nest every top-level node under a group node per owning entity, in order
/// of each entity's first appearance.
pub fn group_by_entity(nodes: Vec<FeatureNode>) -> Vec<FeatureNode> {
    let mut out: Vec<FeatureNode> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for node in nodes {
        let Some(entity) = node.entity().map(str::to_string) else {
            out.push(node);
            continue;
        };
        let index = match group_of.get(&entity) {
            Some(&index) => index,
            None => {
                out.push(FeatureNode::group(entity.clone()));
                group_of.insert(entity, out.len() - 1);
                out.len() - 1
            }
        };
        out[index].children.push(node);
    }
    out
}

/// Full display hierarchy: filter-item groups nested inside entity groups.
pub fn build_hierarchy(descriptors: &[FeatureDescriptor]) -> Vec<FeatureNode> {
    group_by_entity(group_by_filter_item(descriptors))
}
