use std::cmp::Ordering;

use crate::model::{EntityNode, ViewSettings};
use crate::store::ToggleStore;
use crate::tree::assemble::{UiTreeNode, flatten_ui_nodes, is_node_visible, map_groups_to_ui_tree_nodes};
use crate::tree::grouping::{NOOP_GROUP_KEY, group_by, group_items_recursive, group_table};
use crate::tree::sorting::sort_forest;

/// The tree materialization pipeline: sorts, groups, assembles, and
/// flattens an entity forest into UI tree nodes.
///
/// Inputs are held as immutable snapshots; any input change marks the
/// pipeline dirty and the next read recomputes once, however many
/// changes piled up in between. Expansion stores are tracked by
/// version so toggles invalidate the cached flags without the caller
/// wiring anything up.
#[derive(Debug)]
pub struct TreePipeline {
    parent_id: String,
    forest: Vec<EntityNode>,
    settings: ViewSettings,
    cache: Vec<UiTreeNode>,
    dirty: bool,
    expanded_version: Option<u64>,
    description_version: Option<u64>,
}

impl TreePipeline {
    /// `parent_id` scopes synthetic group-header ids, so two pipelines
    /// over different subtrees never collide in the expansion store.
    pub fn new(parent_id: impl Into<String>) -> Self {
        TreePipeline {
            parent_id: parent_id.into(),
            forest: Vec::new(),
            settings: ViewSettings::default(),
            cache: Vec::new(),
            dirty: true,
            expanded_version: None,
            description_version: None,
        }
    }

    pub fn set_forest(&mut self, forest: Vec<EntityNode>) {
        self.forest = forest;
        self.dirty = true;
    }

    pub fn set_settings(&mut self, settings: ViewSettings) {
        if self.settings != settings {
            self.settings = settings;
            self.dirty = true;
        }
    }

    pub fn settings(&self) -> ViewSettings {
        self.settings
    }

    /// The materialized node list, recomputed only if an input changed
    /// since the last call.
    pub fn nodes(&mut self, expanded: &ToggleStore, descriptions: &ToggleStore) -> &[UiTreeNode] {
        let stores_moved = self.expanded_version != Some(expanded.version())
            || self.description_version != Some(descriptions.version());
        if self.dirty || stores_moved {
            self.cache = materialize_tree(&self.forest, self.settings, &self.parent_id);
            for node in &mut self.cache {
                node.is_expanded = expanded.get(&node.id);
                node.is_description_expanded = descriptions.get(&node.id);
            }
            self.dirty = false;
            self.expanded_version = Some(expanded.version());
            self.description_version = Some(descriptions.version());
        }
        &self.cache
    }

    /// Nodes whose every ancestor is expanded, ready for rendering
    pub fn visible_nodes(
        &mut self,
        expanded: &ToggleStore,
        descriptions: &ToggleStore,
    ) -> Vec<UiTreeNode> {
        self.nodes(expanded, descriptions)
            .iter()
            .filter(|n| is_node_visible(n, expanded))
            .cloned()
            .collect()
    }
}

/// One synchronous pure pass: sort → group → assemble → flatten.
/// Empty forests and unset settings degrade to an empty output.
pub fn materialize_tree(
    forest: &[EntityNode],
    settings: ViewSettings,
    parent_id: &str,
) -> Vec<UiTreeNode> {
    if forest.is_empty() {
        return Vec::new();
    }

    let mut sorted = forest.to_vec();
    sort_forest(&mut sorted, settings.sorting);

    let grouping = settings.grouping;
    let grouped = group_items_recursive(&sorted, &|entity, level| {
        if !settings.group_recursive && level > 0 {
            return NOOP_GROUP_KEY.to_string();
        }
        group_by(grouping, entity)
    });

    let table = group_table(grouping);
    let group_metadata = move |key: &str| -> Option<(String, String)> {
        if key == NOOP_GROUP_KEY {
            return None;
        }
        let table = table?;
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, meta)| (meta.label.to_string(), meta.icon.to_string()))
    };
    let group_order = move |a: &str, b: &str| -> Ordering {
        let pos = |key: &str| table.and_then(|t| t.iter().position(|(k, _)| *k == key));
        pos(a).cmp(&pos(b))
    };

    let assembled = map_groups_to_ui_tree_nodes(&grouped, &group_metadata, parent_id, &group_order);
    flatten_ui_nodes(assembled)
}
