use chrono::{NaiveDate, Utc};

use crate::model::{Entity, EntityKind, TaskPriority, TaskStatus};
use crate::store::Workspace;

/// Error type for entity operations
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity not found: {0}")]
    NotFound(String),
    #[error("{0} is not a task")]
    NotATask(String),
    #[error("cannot move {0} under its own descendant {1}")]
    WouldCreateCycle(String, String),
    #[error("invalid parent: {0}")]
    InvalidParent(String),
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Create a task list. `parent_id` must name an existing list (tasks
/// cannot contain lists). Returns the assigned id.
pub fn create_list(
    ws: &mut Workspace,
    title: String,
    parent_id: Option<&str>,
) -> Result<String, EntityError> {
    if let Some(parent_id) = parent_id {
        let parent = ws
            .get(parent_id)
            .ok_or_else(|| EntityError::NotFound(parent_id.to_string()))?;
        if !parent.is_list() {
            return Err(EntityError::InvalidParent(format!(
                "{parent_id} is a task, lists can only nest under lists"
            )));
        }
    }
    let id = next_id(ws, "L");
    ws.insert(Entity::new_list(
        id.clone(),
        title,
        parent_id.map(str::to_string),
    ));
    Ok(id)
}

/// Create a task under a list or another task. Returns the assigned id.
pub fn create_task(ws: &mut Workspace, title: String, parent_id: &str) -> Result<String, EntityError> {
    if !ws.contains(parent_id) {
        return Err(EntityError::NotFound(parent_id.to_string()));
    }
    let id = next_id(ws, "T");
    ws.insert(Entity::new_task(id.clone(), title, parent_id.to_string()));
    Ok(id)
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

pub fn rename(ws: &mut Workspace, id: &str, title: String) -> Result<(), EntityError> {
    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    entity.title = title;
    Ok(())
}

pub fn set_description(
    ws: &mut Workspace,
    id: &str,
    text: Option<String>,
) -> Result<(), EntityError> {
    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    match &mut entity.kind {
        EntityKind::Tasklist { description } => *description = text,
        EntityKind::Task(detail) => detail.description = text,
    }
    Ok(())
}

/// Direct status set — stamps `status_updated_at` on change
pub fn set_status(ws: &mut Workspace, id: &str, status: TaskStatus) -> Result<(), EntityError> {
    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    let detail = entity
        .task_mut()
        .ok_or_else(|| EntityError::NotATask(id.to_string()))?;
    if detail.status != status {
        detail.status = status;
        detail.status_updated_at = Some(Utc::now());
    }
    Ok(())
}

/// Cycle status: open → in-progress → completed → open.
/// Backlog and not-planned re-enter the cycle at open.
pub fn cycle_status(ws: &mut Workspace, id: &str) -> Result<TaskStatus, EntityError> {
    let current = ws
        .get(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?
        .task()
        .ok_or_else(|| EntityError::NotATask(id.to_string()))?
        .status;
    let next = match current {
        TaskStatus::Open => TaskStatus::InProgress,
        TaskStatus::InProgress => TaskStatus::Completed,
        TaskStatus::Completed => TaskStatus::Open,
        TaskStatus::Backlog => TaskStatus::Open,
        TaskStatus::NotPlanned => TaskStatus::Open,
    };
    set_status(ws, id, next)?;
    Ok(next)
}

pub fn set_priority(
    ws: &mut Workspace,
    id: &str,
    priority: TaskPriority,
) -> Result<(), EntityError> {
    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    let detail = entity
        .task_mut()
        .ok_or_else(|| EntityError::NotATask(id.to_string()))?;
    detail.priority = priority;
    Ok(())
}

pub fn set_deadline(
    ws: &mut Workspace,
    id: &str,
    deadline: Option<NaiveDate>,
) -> Result<(), EntityError> {
    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    let detail = entity
        .task_mut()
        .ok_or_else(|| EntityError::NotATask(id.to_string()))?;
    detail.deadline = deadline;
    Ok(())
}

// ---------------------------------------------------------------------------
// Moves and deletion
// ---------------------------------------------------------------------------

/// Reparent an entity (None = make it a root list). Rejects moves that
/// would put an entity under itself or its own descendant, tasks at
/// the root, and lists under tasks.
pub fn move_entity(
    ws: &mut Workspace,
    id: &str,
    new_parent_id: Option<&str>,
) -> Result<(), EntityError> {
    let entity = ws
        .get(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    let is_list = entity.is_list();

    match new_parent_id {
        None => {
            if !is_list {
                return Err(EntityError::InvalidParent(
                    "tasks cannot live at the root".to_string(),
                ));
            }
        }
        Some(parent_id) => {
            let parent = ws
                .get(parent_id)
                .ok_or_else(|| EntityError::NotFound(parent_id.to_string()))?;
            if is_list && !parent.is_list() {
                return Err(EntityError::InvalidParent(format!(
                    "{parent_id} is a task, lists can only nest under lists"
                )));
            }
            if ws.is_descendant_or_self(id, parent_id) {
                return Err(EntityError::WouldCreateCycle(
                    id.to_string(),
                    parent_id.to_string(),
                ));
            }
        }
    }

    let entity = ws
        .get_mut(id)
        .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
    entity.parent_id = new_parent_id.map(str::to_string);
    Ok(())
}

/// Delete an entity and its whole subtree. Returns how many entities
/// were removed.
pub fn delete_entity(ws: &mut Workspace, id: &str) -> Result<usize, EntityError> {
    if !ws.contains(id) {
        return Err(EntityError::NotFound(id.to_string()));
    }
    Ok(ws.remove_subtree(id).len())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Next available id for a prefix, scanning the store for the highest
/// existing number (e.g. "T-014" → "T-015").
fn next_id(ws: &Workspace, prefix: &str) -> String {
    let prefix_dash = format!("{prefix}-");
    let max = ws
        .iter()
        .filter_map(|e| e.id.strip_prefix(&prefix_dash))
        .filter_map(|num| num.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", prefix, max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workspace() -> Workspace {
        let mut ws = Workspace::new();
        create_list(&mut ws, "Work".into(), None).unwrap();
        create_list(&mut ws, "Errands".into(), Some("L-001")).unwrap();
        create_task(&mut ws, "Write report".into(), "L-001").unwrap();
        create_task(&mut ws, "Draft outline".into(), "T-001").unwrap();
        ws
    }

    #[test]
    fn ids_are_sequential_per_prefix() {
        let mut ws = sample_workspace();
        assert_eq!(create_task(&mut ws, "Next".into(), "L-001").unwrap(), "T-003");
        assert_eq!(create_list(&mut ws, "Next".into(), None).unwrap(), "L-003");
    }

    #[test]
    fn list_cannot_nest_under_task() {
        let mut ws = sample_workspace();
        let result = create_list(&mut ws, "Bad".into(), Some("T-001"));
        assert!(matches!(result, Err(EntityError::InvalidParent(_))));
    }

    #[test]
    fn task_requires_existing_parent() {
        let mut ws = sample_workspace();
        let result = create_task(&mut ws, "Orphan".into(), "nope");
        assert!(matches!(result, Err(EntityError::NotFound(_))));
    }

    #[test]
    fn status_change_stamps_timestamp() {
        let mut ws = sample_workspace();
        assert!(ws.get("T-001").unwrap().task().unwrap().status_updated_at.is_none());

        set_status(&mut ws, "T-001", TaskStatus::Completed).unwrap();
        let detail = ws.get("T-001").unwrap().task().unwrap();
        assert_eq!(detail.status, TaskStatus::Completed);
        assert!(detail.status_updated_at.is_some());
    }

    #[test]
    fn same_status_does_not_restamp() {
        let mut ws = sample_workspace();
        set_status(&mut ws, "T-001", TaskStatus::Open).unwrap();
        assert!(ws.get("T-001").unwrap().task().unwrap().status_updated_at.is_none());
    }

    #[test]
    fn cycle_status_walks_the_workflow() {
        let mut ws = sample_workspace();
        assert_eq!(cycle_status(&mut ws, "T-001").unwrap(), TaskStatus::InProgress);
        assert_eq!(cycle_status(&mut ws, "T-001").unwrap(), TaskStatus::Completed);
        assert_eq!(cycle_status(&mut ws, "T-001").unwrap(), TaskStatus::Open);
    }

    #[test]
    fn status_on_list_is_rejected() {
        let mut ws = sample_workspace();
        let result = set_status(&mut ws, "L-001", TaskStatus::Completed);
        assert!(matches!(result, Err(EntityError::NotATask(_))));
    }

    #[test]
    fn move_rejects_cycles() {
        let mut ws = sample_workspace();
        let result = move_entity(&mut ws, "T-001", Some("T-002"));
        assert!(matches!(result, Err(EntityError::WouldCreateCycle(_, _))));
        let result = move_entity(&mut ws, "L-001", Some("L-002"));
        assert!(matches!(result, Err(EntityError::WouldCreateCycle(_, _))));
    }

    #[test]
    fn move_task_between_lists() {
        let mut ws = sample_workspace();
        move_entity(&mut ws, "T-001", Some("L-002")).unwrap();
        assert_eq!(
            ws.get("T-001").unwrap().parent_id.as_deref(),
            Some("L-002")
        );
        // Subtree follows implicitly via parent links
        let tasks = ws.task_forest("L-002");
        assert_eq!(tasks[0].children[0].entity.id, "T-002");
    }

    #[test]
    fn task_cannot_move_to_root() {
        let mut ws = sample_workspace();
        let result = move_entity(&mut ws, "T-001", None);
        assert!(matches!(result, Err(EntityError::InvalidParent(_))));
    }

    #[test]
    fn delete_removes_subtree() {
        let mut ws = sample_workspace();
        assert_eq!(delete_entity(&mut ws, "T-001").unwrap(), 2);
        assert!(!ws.contains("T-002"));
        assert!(matches!(
            delete_entity(&mut ws, "T-001"),
            Err(EntityError::NotFound(_))
        ));
    }

    #[test]
    fn rename_and_describe() {
        let mut ws = sample_workspace();
        rename(&mut ws, "T-001", "Better title".into()).unwrap();
        set_description(&mut ws, "T-001", Some("Notes".into())).unwrap();
        set_description(&mut ws, "L-001", Some("A list".into())).unwrap();
        assert_eq!(ws.get("T-001").unwrap().title, "Better title");
        assert_eq!(ws.get("T-001").unwrap().description(), Some("Notes"));
        assert_eq!(ws.get("L-001").unwrap().description(), Some("A list"));
    }
}
