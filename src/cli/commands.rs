use clap::{Args, Parser, Subcommand};

use crate::model::{GroupKey, SortKey, TaskPriority, TaskStatus};

#[derive(Parser)]
#[command(name = "canopy", about = concat!("canopy v", env!("CARGO_PKG_VERSION"), " - nested tasks, grouped and sorted"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace in the current directory
    Init(InitArgs),
    /// List all task lists
    Lists,
    /// Print the materialized tree (whole workspace, or one list)
    Tree(TreeArgs),
    /// Show entity details and its breadcrumb trail
    Show(ShowArgs),
    /// Add a task (or a list with --list)
    Add(AddArgs),
    /// Set a task's status
    Status(StatusArgs),
    /// Set a task's priority
    Priority(PriorityArgs),
    /// Set or clear a task's deadline
    Deadline(DeadlineArgs),
    /// Change an entity's title
    Title(TitleArgs),
    /// Set or clear an entity's description
    Desc(DescArgs),
    /// Move an entity under a new parent
    Mv(MvArgs),
    /// Delete an entity and its subtree
    Rm(RmArgs),
    /// Search entities by regex
    Search(SearchArgs),
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Workspace name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if a workspace already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// List to print (default: everything)
    pub id: Option<String>,
    /// Sorting strategy
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,
    /// Grouping strategy
    #[arg(long, value_enum)]
    pub group: Option<GroupKey>,
    /// Apply grouping below the root level too
    #[arg(long)]
    pub group_recursive: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
    /// Parent entity (required for tasks; omit for a root list)
    #[arg(long)]
    pub parent: Option<String>,
    /// Create a task list instead of a task
    #[arg(long)]
    pub list: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    pub id: String,
    #[arg(value_enum)]
    pub status: TaskStatus,
}

#[derive(Args)]
pub struct PriorityArgs {
    pub id: String,
    #[arg(value_enum)]
    pub priority: TaskPriority,
}

#[derive(Args)]
pub struct DeadlineArgs {
    pub id: String,
    /// Date as YYYY-MM-DD; omit to clear
    pub date: Option<String>,
}

#[derive(Args)]
pub struct TitleArgs {
    pub id: String,
    pub title: String,
}

#[derive(Args)]
pub struct DescArgs {
    pub id: String,
    /// Omit to clear the description
    pub text: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    pub id: String,
    /// New parent; omit to move a list to the root
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    pub pattern: String,
}
