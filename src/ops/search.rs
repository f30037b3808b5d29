use std::ops::Range;

use regex::Regex;

use crate::model::Entity;
use crate::store::Workspace;

/// Which field of an entity matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Title,
    Description,
}

/// A search hit against one entity field
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entity_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every entity in the workspace, store order. Each matching
/// field yields one hit.
pub fn search_workspace(ws: &Workspace, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for entity in ws.iter() {
        collect_entity_hits(entity, re, &mut hits);
    }
    hits
}

fn collect_entity_hits(entity: &Entity, re: &Regex, hits: &mut Vec<SearchHit>) {
    let id_spans = find_matches(re, &entity.id);
    if !id_spans.is_empty() {
        hits.push(SearchHit {
            entity_id: entity.id.clone(),
            field: MatchField::Id,
            spans: id_spans,
        });
    }

    let title_spans = find_matches(re, &entity.title);
    if !title_spans.is_empty() {
        hits.push(SearchHit {
            entity_id: entity.id.clone(),
            field: MatchField::Title,
            spans: title_spans,
        });
    }

    if let Some(description) = entity.description() {
        let spans = find_matches(re, description);
        if !spans.is_empty() {
            hits.push(SearchHit {
                entity_id: entity.id.clone(),
                field: MatchField::Description,
                spans,
            });
        }
    }
}

/// Compile a case-insensitive pattern, falling back to a literal match
/// when the input is not a valid regex.
pub fn compile_query(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){pattern}"))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}
