use indexmap::IndexMap;

use crate::model::{Entity, EntityNode, GroupKey};

/// Reserved bucket key meaning "no grouping applied". Never a real
/// group key, and never gets a header node in the assembler.
pub const NOOP_GROUP_KEY: &str = "__noop__";

/// Display metadata for a fixed group bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMeta {
    pub label: &'static str,
    pub icon: &'static str,
}

/// Canonical bucket tables per strategy: bucket key → label/icon, in
/// display order. Strategies without a fixed group set return None.
pub fn group_table(key: GroupKey) -> Option<&'static [(&'static str, GroupMeta)]> {
    match key {
        GroupKey::None => None,
        GroupKey::Status => Some(STATUS_GROUPS),
        GroupKey::Priority => Some(PRIORITY_GROUPS),
    }
}

const STATUS_GROUPS: &[(&str, GroupMeta)] = &[
    (
        "in-progress",
        GroupMeta {
            label: "In progress",
            icon: ">",
        },
    ),
    (
        "open",
        GroupMeta {
            label: "Open",
            icon: "o",
        },
    ),
    (
        "backlog",
        GroupMeta {
            label: "Backlog",
            icon: "~",
        },
    ),
    (
        "completed",
        GroupMeta {
            label: "Completed",
            icon: "x",
        },
    ),
    (
        "not-planned",
        GroupMeta {
            label: "Not planned",
            icon: "-",
        },
    ),
];

const PRIORITY_GROUPS: &[(&str, GroupMeta)] = &[
    (
        "urgent",
        GroupMeta {
            label: "Urgent",
            icon: "!!",
        },
    ),
    (
        "high",
        GroupMeta {
            label: "High",
            icon: "!",
        },
    ),
    (
        "medium",
        GroupMeta {
            label: "Medium",
            icon: "=",
        },
    ),
    (
        "none",
        GroupMeta {
            label: "No priority",
            icon: ".",
        },
    ),
    (
        "optional",
        GroupMeta {
            label: "Optional",
            icon: "?",
        },
    ),
];

/// Bucket key for one entity under the given strategy. Lists never
/// carry status or priority and land in the sentinel bucket.
pub fn group_by(key: GroupKey, entity: &Entity) -> String {
    let Some(task) = entity.task() else {
        return NOOP_GROUP_KEY.to_string();
    };
    match key {
        GroupKey::None => NOOP_GROUP_KEY.to_string(),
        GroupKey::Status => task.status.key().to_string(),
        GroupKey::Priority => task.priority.key().to_string(),
    }
}

/// A sibling set partitioned into ordered buckets, recursively
#[derive(Debug, Clone, Default)]
pub struct GroupedNodes {
    /// Bucket key → members, in first-seen-key order
    pub buckets: IndexMap<String, Vec<GroupedNode>>,
}

#[derive(Debug, Clone)]
pub struct GroupedNode {
    pub entity: Entity,
    pub children: GroupedNodes,
}

impl GroupedNodes {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Partition a sibling list into ordered buckets via
/// `classifier(entity, level)`, recursing into children. The classifier
/// sees the recursion depth so callers can group only root siblings and
/// return [`NOOP_GROUP_KEY`] below.
pub fn group_items_recursive(
    nodes: &[EntityNode],
    classifier: &dyn Fn(&Entity, usize) -> String,
) -> GroupedNodes {
    group_at_level(nodes, classifier, 0)
}

fn group_at_level(
    nodes: &[EntityNode],
    classifier: &dyn Fn(&Entity, usize) -> String,
    level: usize,
) -> GroupedNodes {
    let mut buckets: IndexMap<String, Vec<GroupedNode>> = IndexMap::new();
    for node in nodes {
        let key = classifier(&node.entity, level);
        buckets.entry(key).or_default().push(GroupedNode {
            entity: node.entity.clone(),
            children: group_at_level(&node.children, classifier, level + 1),
        });
    }
    GroupedNodes { buckets }
}
