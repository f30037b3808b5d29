use std::cmp::Ordering;

use crate::model::Entity;
use crate::store::ToggleStore;
use crate::tree::grouping::{GroupedNode, GroupedNodes};

/// Marker embedded in every synthetic group-header id. Header ids are
/// `{parent_id}.group-{key}`, so membership in a path is detectable by
/// substring without re-traversing the source forest.
const GROUP_ID_MARKER: &str = ".group-";

/// Display payload of a synthetic group-header node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    pub key: String,
    pub label: String,
    pub icon: String,
}

/// What a UI tree node renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiNodeContent {
    Entity(Entity),
    GroupHeader(GroupHeader),
}

/// Recursive intermediate produced by the assembler, flattened before
/// anything renders it.
#[derive(Debug, Clone)]
pub struct UiNode {
    pub id: String,
    pub content: UiNodeContent,
    pub children: Vec<UiNode>,
}

/// The final render unit: a real entity or a group header, with its
/// ancestor path and the indentation correction for group headers.
#[derive(Debug, Clone)]
pub struct UiTreeNode {
    pub id: String,
    pub content: UiNodeContent,
    /// Ancestor id chain root..self, group-header ids included
    pub path: Vec<String>,
    pub children_count: usize,
    /// −1 per group-header id in the path, so headers participate in
    /// expansion tracking without consuming an indentation level
    pub indentation_offset: i32,
    pub is_expanded: bool,
    pub is_description_expanded: bool,
}

impl UiTreeNode {
    pub fn is_group_header(&self) -> bool {
        matches!(self.content, UiNodeContent::GroupHeader(_))
    }

    pub fn entity(&self) -> Option<&Entity> {
        match &self.content {
            UiNodeContent::Entity(entity) => Some(entity),
            UiNodeContent::GroupHeader(_) => None,
        }
    }

    /// Rendered indent depth: path depth corrected by the group offset
    pub fn indent_level(&self) -> usize {
        (self.path.len() as i32 - 1 + self.indentation_offset).max(0) as usize
    }
}

/// Walk a grouped sibling structure and synthesize one header node per
/// non-sentinel bucket, ahead of its members, recursing with the header
/// id as the new parent id. `group_metadata` returning None (sentinel
/// key, or no fixed group set) suppresses the header and attaches
/// members directly to the existing parent id. `group_order` fixes the
/// bucket display order; ties keep first-seen order.
pub fn map_groups_to_ui_tree_nodes(
    grouped: &GroupedNodes,
    group_metadata: &dyn Fn(&str) -> Option<(String, String)>,
    parent_id: &str,
    group_order: &dyn Fn(&str, &str) -> Ordering,
) -> Vec<UiNode> {
    let mut keys: Vec<&String> = grouped.buckets.keys().collect();
    keys.sort_by(|a, b| group_order(a, b));

    let mut out = Vec::new();
    for key in keys {
        let members = &grouped.buckets[key];
        match group_metadata(key) {
            Some((label, icon)) => {
                let header_id = format!("{parent_id}{GROUP_ID_MARKER}{key}");
                let children = members
                    .iter()
                    .map(|m| entity_ui_node(m, group_metadata, group_order))
                    .collect();
                out.push(UiNode {
                    id: header_id.clone(),
                    content: UiNodeContent::GroupHeader(GroupHeader {
                        key: key.clone(),
                        label,
                        icon,
                    }),
                    children,
                });
            }
            None => {
                for m in members {
                    out.push(entity_ui_node(m, group_metadata, group_order));
                }
            }
        }
    }
    out
}

fn entity_ui_node(
    node: &GroupedNode,
    group_metadata: &dyn Fn(&str) -> Option<(String, String)>,
    group_order: &dyn Fn(&str, &str) -> Ordering,
) -> UiNode {
    UiNode {
        id: node.entity.id.clone(),
        content: UiNodeContent::Entity(node.entity.clone()),
        children: map_groups_to_ui_tree_nodes(
            &node.children,
            group_metadata,
            &node.entity.id,
            group_order,
        ),
    }
}

/// Flatten assembled nodes in pre-order, accumulate paths, and compute
/// each node's indentation offset from the group-header ids in its path.
pub fn flatten_ui_nodes(nodes: Vec<UiNode>) -> Vec<UiTreeNode> {
    let mut out = Vec::new();
    flatten_ui_into(nodes, &[], &mut out);
    for node in &mut out {
        let group_ancestors = node
            .path
            .iter()
            .filter(|id| id.contains(GROUP_ID_MARKER))
            .count();
        node.indentation_offset = -(group_ancestors as i32);
    }
    out
}

fn flatten_ui_into(nodes: Vec<UiNode>, parent_path: &[String], out: &mut Vec<UiTreeNode>) {
    for node in nodes {
        let mut path = parent_path.to_vec();
        path.push(node.id.clone());
        out.push(UiTreeNode {
            id: node.id,
            content: node.content,
            path: path.clone(),
            children_count: node.children.len(),
            indentation_offset: 0,
            is_expanded: false,
            is_description_expanded: false,
        });
        flatten_ui_into(node.children, &path, out);
    }
}

/// A node renders iff every strict ancestor in its path is expanded.
/// This walks the path, not the forest, so visibility is O(depth).
/// Roots have no ancestors and are always visible.
pub fn is_node_visible(node: &UiTreeNode, expanded: &ToggleStore) -> bool {
    let ancestors = &node.path[..node.path.len().saturating_sub(1)];
    ancestors.iter().all(|id| expanded.get(id))
}
