use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::settings::ViewSettings;

/// Configuration from canopy.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    /// View settings applied when no saved UI state exists
    #[serde(default)]
    pub defaults: ViewSettings,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Whether tasks in the main tree start expanded
    #[serde(default = "default_true")]
    pub expand_tasks: bool,
    /// Whether sidebar entries start expanded
    #[serde(default)]
    pub expand_sidebar: bool,
    /// Color overrides, hex strings keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            expand_tasks: true,
            expand_sidebar: false,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
