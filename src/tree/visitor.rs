use std::collections::HashMap;

use crate::model::{Entity, EntityNode};

/// Visit every node of the forest in pre-order, roots included.
pub fn visit_descendants<'a>(forest: &'a [EntityNode], f: &mut impl FnMut(&'a EntityNode)) {
    for node in forest {
        f(node);
        visit_descendants(&node.children, f);
    }
}

/// Ancestor chain root..target (inclusive) for `target_id`, or None if
/// the id is nowhere in the forest. Depth-first, short-circuits on the
/// first match.
pub fn trace_entity<'a>(forest: &'a [EntityNode], target_id: &str) -> Option<Vec<&'a Entity>> {
    for node in forest {
        if node.entity.id == target_id {
            return Some(vec![&node.entity]);
        }
        if let Some(mut chain) = trace_entity(&node.children, target_id) {
            chain.insert(0, &node.entity);
            return Some(chain);
        }
    }
    None
}

/// Like [`trace_entity`], but additionally descends into the
/// side-loaded task subtree of every list node.
pub fn trace_entity_including_tasks<'a>(
    forest: &'a [EntityNode],
    task_tree_map: &'a HashMap<String, Vec<EntityNode>>,
    target_id: &str,
) -> Option<Vec<&'a Entity>> {
    for node in forest {
        if node.entity.id == target_id {
            return Some(vec![&node.entity]);
        }
        let found = trace_entity_including_tasks(&node.children, task_tree_map, target_id)
            .or_else(|| {
                if !node.entity.is_list() {
                    return None;
                }
                let tasks = task_tree_map.get(&node.entity.id)?;
                // Task subtrees don't nest further lists
                trace_entity(tasks, target_id)
            });
        if let Some(mut chain) = found {
            chain.insert(0, &node.entity);
            return Some(chain);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityNode;
    use crate::store::Workspace;
    use crate::model::Entity;

    fn node(entity: Entity, children: Vec<EntityNode>) -> EntityNode {
        EntityNode { entity, children }
    }

    fn sample_forest() -> Vec<EntityNode> {
        let l1 = Entity::new_list("L-1".into(), "Root".into(), None);
        let l2 = Entity::new_list("L-2".into(), "Nested".into(), Some("L-1".into()));
        let l3 = Entity::new_list("L-3".into(), "Other".into(), None);
        vec![
            node(l1, vec![node(l2, vec![])]),
            node(l3, vec![]),
        ]
    }

    #[test]
    fn visit_descendants_covers_all_nodes_in_preorder() {
        let forest = sample_forest();
        let mut seen = Vec::new();
        visit_descendants(&forest, &mut |n| seen.push(n.entity.id.clone()));
        assert_eq!(seen, vec!["L-1", "L-2", "L-3"]);
    }

    #[test]
    fn trace_finds_nested_target() {
        let forest = sample_forest();
        let chain = trace_entity(&forest, "L-2").unwrap();
        let ids: Vec<&str> = chain.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["L-1", "L-2"]);
    }

    #[test]
    fn trace_missing_target_is_none() {
        let forest = sample_forest();
        assert!(trace_entity(&forest, "nope").is_none());
        assert!(trace_entity(&[], "L-1").is_none());
    }

    #[test]
    fn trace_including_tasks_crosses_into_task_subtrees() {
        let mut ws = Workspace::new();
        ws.insert(Entity::new_list("L-1".into(), "Work".into(), None));
        ws.insert(Entity::new_list(
            "L-2".into(),
            "Sub".into(),
            Some("L-1".into()),
        ));
        ws.insert(Entity::new_task(
            "T-1".into(),
            "Task".into(),
            "L-2".into(),
        ));
        ws.insert(Entity::new_task(
            "T-2".into(),
            "Subtask".into(),
            "T-1".into(),
        ));

        let forest = ws.list_forest();
        let map = ws.task_tree_map();
        let chain = trace_entity_including_tasks(&forest, &map, "T-2").unwrap();
        let ids: Vec<&str> = chain.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["L-1", "L-2", "T-1", "T-2"]);
    }

    #[test]
    fn trace_including_tasks_still_finds_lists() {
        let mut ws = Workspace::new();
        ws.insert(Entity::new_list("L-1".into(), "Work".into(), None));
        ws.insert(Entity::new_list(
            "L-2".into(),
            "Sub".into(),
            Some("L-1".into()),
        ));
        let forest = ws.list_forest();
        let map = ws.task_tree_map();
        let chain = trace_entity_including_tasks(&forest, &map, "L-2").unwrap();
        assert_eq!(chain.len(), 2);
    }
}
