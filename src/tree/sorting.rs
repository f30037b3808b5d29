use std::cmp::Ordering;

use crate::model::{EntityNode, SortKey, TaskStatus};

/// Rank used when sorting by status: active work first, closed last
fn status_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::InProgress => 0,
        TaskStatus::Open => 1,
        TaskStatus::Backlog => 2,
        TaskStatus::Completed => 3,
        TaskStatus::NotPlanned => 4,
    }
}

fn compare(key: SortKey, a: &EntityNode, b: &EntityNode) -> Ordering {
    match key {
        SortKey::None => Ordering::Equal,
        SortKey::PriorityDesc => {
            let pa = a.entity.task().map(|t| t.priority);
            let pb = b.entity.task().map(|t| t.priority);
            // Lists (None) sort after tasks
            pb.cmp(&pa)
        }
        SortKey::CreatedAtAsc => a.entity.created_at.cmp(&b.entity.created_at),
        SortKey::Status => {
            // Lists carry no status and sort after tasks
            let ra = a.entity.task().map_or(u8::MAX, |t| status_rank(t.status));
            let rb = b.entity.task().map_or(u8::MAX, |t| status_rank(t.status));
            ra.cmp(&rb)
        }
    }
}

/// Stable-sort every sibling set in the forest, in place. Equal-key
/// siblings keep their relative input order; `SortKey::None` leaves the
/// forest untouched.
pub fn sort_forest(forest: &mut [EntityNode], key: SortKey) {
    if key == SortKey::None {
        return;
    }
    forest.sort_by(|a, b| compare(key, a, b));
    for node in forest.iter_mut() {
        sort_forest(&mut node.children, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::model::{Entity, TaskPriority};

    fn task(id: &str, priority: TaskPriority) -> EntityNode {
        let mut entity = Entity::new_task(id.into(), id.into(), "L-1".into());
        if let Some(detail) = entity.task_mut() {
            detail.priority = priority;
        }
        EntityNode::leaf(entity)
    }

    fn ids(forest: &[EntityNode]) -> Vec<&str> {
        forest.iter().map(|n| n.entity.id.as_str()).collect()
    }

    #[test]
    fn priority_sort_is_stable() {
        // A(medium), B(none), C(medium) ascending-by-urgency reversed:
        // descending puts B last and keeps A before C
        let mut forest = vec![
            task("A", TaskPriority::Medium),
            task("B", TaskPriority::None),
            task("C", TaskPriority::Medium),
        ];
        sort_forest(&mut forest, SortKey::PriorityDesc);
        assert_eq!(ids(&forest), vec!["A", "C", "B"]);
    }

    #[test]
    fn none_sort_is_identity() {
        let mut forest = vec![
            task("C", TaskPriority::Urgent),
            task("A", TaskPriority::None),
        ];
        sort_forest(&mut forest, SortKey::None);
        assert_eq!(ids(&forest), vec!["C", "A"]);
    }

    #[test]
    fn created_at_sorts_oldest_first() {
        let mut older = task("old", TaskPriority::None);
        older.entity.created_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut newer = task("new", TaskPriority::None);
        newer.entity.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut forest = vec![newer, older];
        sort_forest(&mut forest, SortKey::CreatedAtAsc);
        assert_eq!(ids(&forest), vec!["old", "new"]);
    }

    #[test]
    fn sorting_recurses_into_children() {
        let mut parent = task("P", TaskPriority::None);
        parent.children = vec![
            task("low", TaskPriority::Optional),
            task("hot", TaskPriority::Urgent),
        ];
        let mut forest = vec![parent];
        sort_forest(&mut forest, SortKey::PriorityDesc);
        assert_eq!(ids(&forest[0].children), vec!["hot", "low"]);
    }

    #[test]
    fn status_sort_puts_active_work_first() {
        let mk = |id: &str, status: TaskStatus| {
            let mut node = task(id, TaskPriority::None);
            node.entity.task_mut().unwrap().status = status;
            node
        };
        let mut forest = vec![
            mk("done", TaskStatus::Completed),
            mk("wip", TaskStatus::InProgress),
            mk("open", TaskStatus::Open),
        ];
        sort_forest(&mut forest, SortKey::Status);
        assert_eq!(ids(&forest), vec!["wip", "open", "done"]);
    }
}
