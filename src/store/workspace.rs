use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityNode};

/// The normalized store: entity id → record, in creation order.
/// Sibling order is the insertion order of the map, filtered by parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workspace {
    entities: IndexMap<String, Entity>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Workspace {
            entities: entities.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Direct children of `parent_id` (None = roots), in store order
    pub fn children_of(&self, parent_id: Option<&str>) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| e.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Whether `id` is `ancestor_id` or one of its descendants.
    /// Used to reject reparent operations that would create a cycle.
    pub fn is_descendant_or_self(&self, ancestor_id: &str, id: &str) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == ancestor_id {
                return true;
            }
            current = self.get(cursor).and_then(|e| e.parent_id.as_deref());
        }
        false
    }

    /// Remove an entity and its entire subtree. Returns the removed
    /// entities in no particular order; empty if `id` is absent.
    pub fn remove_subtree(&mut self, id: &str) -> Vec<Entity> {
        let doomed: Vec<String> = self
            .entities
            .keys()
            .filter(|key| self.is_descendant_or_self(id, key))
            .cloned()
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(entity) = self.entities.shift_remove(&key) {
                removed.push(entity);
            }
        }
        removed
    }

    /// The recursive forest of task lists only (the sidebar's entity
    /// tree). Tasks are side-loaded via [`Workspace::task_tree_map`].
    pub fn list_forest(&self) -> Vec<EntityNode> {
        self.build_list_nodes(None)
    }

    fn build_list_nodes(&self, parent_id: Option<&str>) -> Vec<EntityNode> {
        self.entities
            .values()
            .filter(|e| e.is_list() && e.parent_id.as_deref() == parent_id)
            .map(|e| EntityNode {
                entity: e.clone(),
                children: self.build_list_nodes(Some(&e.id)),
            })
            .collect()
    }

    /// Recursive forest of the tasks directly under `parent_id`
    /// (a list or a task), descending through nested tasks.
    pub fn task_forest(&self, parent_id: &str) -> Vec<EntityNode> {
        self.entities
            .values()
            .filter(|e| !e.is_list() && e.parent_id.as_deref() == Some(parent_id))
            .map(|e| EntityNode {
                entity: e.clone(),
                children: self.task_forest(&e.id),
            })
            .collect()
    }

    /// The whole workspace as one forest: lists with their task
    /// subtrees resolved in as children ahead of nested lists, mirroring
    /// the splicing flattener's order.
    pub fn full_forest(&self) -> Vec<EntityNode> {
        self.build_full_nodes(None)
    }

    fn build_full_nodes(&self, parent_id: Option<&str>) -> Vec<EntityNode> {
        self.entities
            .values()
            .filter(|e| e.is_list() && e.parent_id.as_deref() == parent_id)
            .map(|e| {
                let mut children = self.task_forest(&e.id);
                children.extend(self.build_full_nodes(Some(&e.id)));
                EntityNode {
                    entity: e.clone(),
                    children,
                }
            })
            .collect()
    }

    /// Side map of list id → that list's task subtree, consumed by the
    /// splicing flattener and the including-tasks tracer.
    pub fn task_tree_map(&self) -> HashMap<String, Vec<EntityNode>> {
        self.entities
            .values()
            .filter(|e| e.is_list())
            .map(|list| (list.id.clone(), self.task_forest(&list.id)))
            .collect()
    }
}
