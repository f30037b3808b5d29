use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant for the two entity kinds in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Tasklist,
    Task,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Tasklist => write!(f, "list"),
            EntityType::Task => write!(f, "task"),
        }
    }
}

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Backlog,
    Open,
    InProgress,
    Completed,
    NotPlanned,
}

impl TaskStatus {
    /// Stable string key, used for group bucket keys and display
    pub fn key(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::NotPlanned => "not-planned",
        }
    }

    /// The character shown inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Backlog => '~',
            TaskStatus::Open => ' ',
            TaskStatus::InProgress => '>',
            TaskStatus::Completed => 'x',
            TaskStatus::NotPlanned => '-',
        }
    }

    /// Completed and not-planned tasks count as closed
    pub fn is_closed(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::NotPlanned)
    }
}

/// Task priority, ordered lowest to highest so `Ord` matches urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Optional,
    None,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Stable string key, used for group bucket keys and display
    pub fn key(self) -> &'static str {
        match self {
            TaskPriority::Optional => "optional",
            TaskPriority::None => "none",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

/// Task-specific fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Updated whenever the status changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
}

impl Default for TaskDetail {
    fn default() -> Self {
        TaskDetail {
            status: TaskStatus::Open,
            priority: TaskPriority::None,
            deadline: None,
            description: None,
            status_updated_at: None,
        }
    }
}

/// Kind-specific payload of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "lowercase")]
pub enum EntityKind {
    Tasklist {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Task(TaskDetail),
}

/// A single record in the normalized store: a task or a task list.
/// The parent/child graph must stay a forest — no entity is its own
/// descendant, and every non-root entity has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub title: String,
    /// None for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn new_list(id: String, title: String, parent_id: Option<String>) -> Self {
        Entity {
            id,
            title,
            parent_id,
            created_at: Utc::now(),
            kind: EntityKind::Tasklist { description: None },
        }
    }

    pub fn new_task(id: String, title: String, parent_id: String) -> Self {
        Entity {
            id,
            title,
            parent_id: Some(parent_id),
            created_at: Utc::now(),
            kind: EntityKind::Task(TaskDetail::default()),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Tasklist { .. } => EntityType::Tasklist,
            EntityKind::Task(_) => EntityType::Task,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, EntityKind::Tasklist { .. })
    }

    pub fn task(&self) -> Option<&TaskDetail> {
        match &self.kind {
            EntityKind::Task(detail) => Some(detail),
            EntityKind::Tasklist { .. } => None,
        }
    }

    pub fn task_mut(&mut self) -> Option<&mut TaskDetail> {
        match &mut self.kind {
            EntityKind::Task(detail) => Some(detail),
            EntityKind::Tasklist { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Tasklist { description } => description.as_deref(),
            EntityKind::Task(detail) => detail.description.as_deref(),
        }
    }
}

/// An entity with its children resolved in place. Built fresh from the
/// normalized store per render, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNode {
    pub entity: Entity,
    pub children: Vec<EntityNode>,
}

impl EntityNode {
    pub fn leaf(entity: Entity) -> Self {
        EntityNode {
            entity,
            children: Vec::new(),
        }
    }
}

/// An entity stripped of its children, annotated with its ancestor id
/// chain (root..self inclusive) and direct child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedEntity {
    pub entity: Entity,
    pub path: Vec<String>,
    pub children_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_checkbox_chars_are_distinct() {
        let all = [
            TaskStatus::Backlog,
            TaskStatus::Open,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::NotPlanned,
        ];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.checkbox_char(), b.checkbox_char());
                }
            }
        }
    }

    #[test]
    fn priority_ordering_matches_urgency() {
        assert!(TaskPriority::Urgent > TaskPriority::High);
        assert!(TaskPriority::High > TaskPriority::Medium);
        assert!(TaskPriority::Medium > TaskPriority::None);
        assert!(TaskPriority::None > TaskPriority::Optional);
    }

    #[test]
    fn entity_serde_round_trip() {
        let mut task = Entity::new_task("T-001".into(), "Write docs".into(), "L-001".into());
        if let Some(detail) = task.task_mut() {
            detail.priority = TaskPriority::High;
            detail.status = TaskStatus::InProgress;
        }

        let json = serde_json::to_string(&task).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
        assert_eq!(back.entity_type(), EntityType::Task);
    }

    #[test]
    fn list_serde_round_trip() {
        let list = Entity::new_list("L-001".into(), "Inbox".into(), None);
        let json = serde_json::to_string(&list).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
        assert!(back.is_list());
        assert!(back.task().is_none());
    }
}
