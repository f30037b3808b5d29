use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which sorting strategy a view applies to every sibling set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the order siblings have in the store
    #[default]
    None,
    /// Highest priority first
    PriorityDesc,
    /// Oldest first
    CreatedAtAsc,
    /// Workflow order: in-progress, open, backlog, completed, not-planned
    Status,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "manual",
            SortKey::PriorityDesc => "priority",
            SortKey::CreatedAtAsc => "created",
            SortKey::Status => "status",
        }
    }

    /// Cycle order for the TUI's sort toggle
    pub fn next(self) -> Self {
        match self {
            SortKey::None => SortKey::PriorityDesc,
            SortKey::PriorityDesc => SortKey::CreatedAtAsc,
            SortKey::CreatedAtAsc => SortKey::Status,
            SortKey::Status => SortKey::None,
        }
    }
}

/// Which grouping strategy a view applies to sibling sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKey {
    #[default]
    None,
    Status,
    Priority,
}

impl GroupKey {
    pub fn label(self) -> &'static str {
        match self {
            GroupKey::None => "none",
            GroupKey::Status => "status",
            GroupKey::Priority => "priority",
        }
    }

    /// Cycle order for the TUI's group toggle
    pub fn next(self) -> Self {
        match self {
            GroupKey::None => GroupKey::Status,
            GroupKey::Status => GroupKey::Priority,
            GroupKey::Priority => GroupKey::None,
        }
    }
}

/// Per-view settings driving the tree materialization pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub sorting: SortKey,
    #[serde(default)]
    pub grouping: GroupKey,
    /// When false, grouping applies only to root-level siblings
    #[serde(default)]
    pub group_recursive: bool,
}
