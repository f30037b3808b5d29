use std::collections::HashMap;

use crate::model::{EntityNode, FlattenedEntity};

/// Flatten a recursive forest into pre-order, each node annotated with
/// the ancestor id chain from its root (self inclusive). Sibling order
/// is kept as given, so upstream sorting/grouping decides it.
pub fn flatten_tree(forest: &[EntityNode]) -> Vec<FlattenedEntity> {
    let mut out = Vec::new();
    flatten_into(forest, &[], &mut out);
    out
}

fn flatten_into(nodes: &[EntityNode], parent_path: &[String], out: &mut Vec<FlattenedEntity>) {
    for node in nodes {
        let mut path = parent_path.to_vec();
        path.push(node.entity.id.clone());
        out.push(FlattenedEntity {
            entity: node.entity.clone(),
            path: path.clone(),
            children_count: node.children.len(),
        });
        flatten_into(&node.children, &path, out);
    }
}

/// Flatten the list forest, splicing each list's task subtree (from the
/// side map) in as descendants of that list before moving on. Lists
/// count their spliced root tasks as children.
pub fn flatten_entity_tree_including_tasks(
    forest: &[EntityNode],
    task_tree_map: &HashMap<String, Vec<EntityNode>>,
) -> Vec<FlattenedEntity> {
    let mut out = Vec::new();
    flatten_including_tasks_into(forest, task_tree_map, &[], &mut out);
    out
}

fn flatten_including_tasks_into(
    nodes: &[EntityNode],
    task_tree_map: &HashMap<String, Vec<EntityNode>>,
    parent_path: &[String],
    out: &mut Vec<FlattenedEntity>,
) {
    for node in nodes {
        let mut path = parent_path.to_vec();
        path.push(node.entity.id.clone());

        let spliced_tasks = if node.entity.is_list() {
            task_tree_map.get(&node.entity.id).map(Vec::as_slice)
        } else {
            None
        };
        let task_count = spliced_tasks.map_or(0, <[EntityNode]>::len);

        out.push(FlattenedEntity {
            entity: node.entity.clone(),
            path: path.clone(),
            children_count: node.children.len() + task_count,
        });

        if let Some(tasks) = spliced_tasks {
            // Tasks don't nest lists, the plain flattener suffices below here
            flatten_into(tasks, &path, out);
        }
        flatten_including_tasks_into(&node.children, task_tree_map, &path, out);
    }
}
