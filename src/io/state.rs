use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::ViewSettings;
use crate::store::ToggleStore;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Active view settings (sort/group selection)
    #[serde(default)]
    pub view_settings: ViewSettings,
    /// Per-entity expansion in the main tree (explicit entries only)
    #[serde(default)]
    pub expanded: HashMap<String, bool>,
    /// Per-entity description expansion
    #[serde(default)]
    pub description_expanded: HashMap<String, bool>,
    /// Per-entity expansion in the sidebar
    #[serde(default)]
    pub sidebar_expanded: HashMap<String, bool>,
    /// Entity the cursor was on
    #[serde(default)]
    pub active_entity: Option<String>,
    #[serde(default)]
    pub scroll_offset: usize,
}

impl UiState {
    /// Capture the runtime stores into a persistable snapshot
    pub fn capture(
        view_settings: ViewSettings,
        expanded: &ToggleStore,
        description_expanded: &ToggleStore,
        sidebar_expanded: &ToggleStore,
    ) -> Self {
        UiState {
            view_settings,
            expanded: expanded.entries().clone(),
            description_expanded: description_expanded.entries().clone(),
            sidebar_expanded: sidebar_expanded.entries().clone(),
            active_entity: None,
            scroll_offset: 0,
        }
    }
}

/// Read .state.json from the workspace directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the workspace directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupKey, SortKey};
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            view_settings: ViewSettings {
                sorting: SortKey::PriorityDesc,
                grouping: GroupKey::Status,
                group_recursive: true,
            },
            active_entity: Some("T-001".into()),
            scroll_offset: 7,
            ..Default::default()
        };
        state.expanded.insert("T-001".into(), false);
        state.sidebar_expanded.insert("L-001".into(), true);

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert_eq!(loaded.view_settings.sorting, SortKey::PriorityDesc);
        assert_eq!(loaded.view_settings.grouping, GroupKey::Status);
        assert!(loaded.view_settings.group_recursive);
        assert_eq!(loaded.expanded.get("T-001"), Some(&false));
        assert_eq!(loaded.sidebar_expanded.get("L-001"), Some(&true));
        assert_eq!(loaded.active_entity.as_deref(), Some("T-001"));
        assert_eq!(loaded.scroll_offset, 7);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.view_settings.sorting, SortKey::None);
        assert!(state.expanded.is_empty());
        assert!(state.active_entity.is_none());
    }

    #[test]
    fn capture_keeps_only_explicit_entries() {
        let mut expanded = ToggleStore::new(true);
        expanded.set("T-001", false);
        let descriptions = ToggleStore::new(false);
        let sidebar = ToggleStore::new(false);

        let state = UiState::capture(
            ViewSettings::default(),
            &expanded,
            &descriptions,
            &sidebar,
        );
        assert_eq!(state.expanded.len(), 1);
        assert!(state.description_expanded.is_empty());
    }
}
