use serde::Serialize;

use crate::model::{Entity, TaskPriority, TaskStatus};
use crate::ops::search::{MatchField, SearchHit};
use crate::store::Workspace;
use crate::tree::{UiNodeContent, UiTreeNode};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntityJson {
    pub id: String,
    pub title: String,
    #[serde(rename = "entityType")]
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityJson {
    pub fn from_entity(entity: &Entity) -> Self {
        EntityJson {
            id: entity.id.clone(),
            title: entity.title.clone(),
            entity_type: entity.entity_type().to_string(),
            parent_id: entity.parent_id.clone(),
            status: entity.task().map(|t| t.status),
            priority: entity.task().map(|t| t.priority),
            deadline: entity
                .task()
                .and_then(|t| t.deadline)
                .map(|d| d.to_string()),
            description: entity.description().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
pub struct TreeNodeJson {
    pub id: String,
    pub kind: &'static str,
    pub title: String,
    pub path: Vec<String>,
    pub indent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: String,
    pub field: &'static str,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// One printable line per materialized node, indented by corrected depth
pub fn tree_node_line(node: &UiTreeNode) -> String {
    let indent = "  ".repeat(node.indent_level());
    match &node.content {
        UiNodeContent::GroupHeader(header) => {
            format!("{indent}-- {} --", header.label)
        }
        UiNodeContent::Entity(entity) => match entity.task() {
            Some(detail) => format!(
                "{indent}[{}] {} {}",
                detail.status.checkbox_char(),
                entity.id,
                entity.title
            ),
            None => format!("{indent}# {} {}", entity.id, entity.title),
        },
    }
}

pub fn print_tree(nodes: &[UiTreeNode]) {
    for node in nodes {
        println!("{}", tree_node_line(node));
    }
}

pub fn print_tree_json(nodes: &[UiTreeNode]) {
    let out: Vec<TreeNodeJson> = nodes
        .iter()
        .map(|node| TreeNodeJson {
            id: node.id.clone(),
            kind: if node.is_group_header() {
                "group"
            } else {
                "entity"
            },
            title: match &node.content {
                UiNodeContent::GroupHeader(h) => h.label.clone(),
                UiNodeContent::Entity(e) => e.title.clone(),
            },
            path: node.path.clone(),
            indent: node.indent_level(),
            status: node.entity().and_then(|e| e.task()).map(|t| t.status),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
}

pub fn print_entity(entity: &Entity, trail: &[String]) {
    if !trail.is_empty() {
        println!("{}", trail.join(" > "));
    }
    println!("{} {} ({})", entity.id, entity.title, entity.entity_type());
    if let Some(detail) = entity.task() {
        println!("  status:   {}", detail.status.key());
        println!("  priority: {}", detail.priority.key());
        if let Some(deadline) = detail.deadline {
            println!("  deadline: {deadline}");
        }
    }
    if let Some(description) = entity.description() {
        println!("  {description}");
    }
}

pub fn print_search_hits(ws: &Workspace, hits: &[SearchHit], json: bool) {
    let field_name = |field: MatchField| match field {
        MatchField::Id => "id",
        MatchField::Title => "title",
        MatchField::Description => "description",
    };
    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .map(|hit| SearchHitJson {
                id: hit.entity_id.clone(),
                field: field_name(hit.field),
                title: ws
                    .get(&hit.entity_id)
                    .map(|e| e.title.clone())
                    .unwrap_or_default(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return;
    }
    for hit in hits {
        let title = ws
            .get(&hit.entity_id)
            .map(|e| e.title.as_str())
            .unwrap_or("?");
        println!("{}  {}  ({})", hit.entity_id, title, field_name(hit.field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityNode;
    use crate::model::ViewSettings;
    use crate::tree::materialize_tree;

    #[test]
    fn tree_lines_indent_by_corrected_depth() {
        let list = Entity::new_list("L-1".into(), "Work".into(), None);
        let task = Entity::new_task("T-1".into(), "Report".into(), "L-1".into());
        let forest = vec![EntityNode {
            entity: list,
            children: vec![EntityNode::leaf(task)],
        }];
        let nodes = materialize_tree(&forest, ViewSettings::default(), "root");
        let lines: Vec<String> = nodes.iter().map(tree_node_line).collect();
        assert_eq!(lines[0], "# L-1 Work");
        assert_eq!(lines[1], "  [ ] T-1 Report");
    }

    #[test]
    fn entity_json_includes_task_fields_only_for_tasks() {
        let list = Entity::new_list("L-1".into(), "Work".into(), None);
        let json = serde_json::to_value(EntityJson::from_entity(&list)).unwrap();
        assert!(json.get("status").is_none());

        let task = Entity::new_task("T-1".into(), "Report".into(), "L-1".into());
        let json = serde_json::to_value(EntityJson::from_entity(&task)).unwrap();
        assert_eq!(json["status"], "open");
    }
}
