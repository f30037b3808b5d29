use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output;
use crate::io::config_io::{load_config, write_config};
use crate::io::workspace_io::{WorkspaceIoError, load_workspace, save_workspace, workspace_exists};
use crate::model::{ViewSettings, WorkspaceConfig};
use crate::ops::entity_ops::{self, EntityError};
use crate::ops::search::{compile_query, search_workspace};
use crate::store::Workspace;
use crate::tree::{flatten_tree, materialize_tree, trace_entity_including_tasks};

/// Error type for CLI command handling
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceIoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Invalid(String),
}

fn workspace_dir(cli: &Cli) -> PathBuf {
    cli.workspace_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Dispatch a parsed CLI invocation (init is handled separately)
pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let dir = workspace_dir(&cli);
    let Some(command) = &cli.command else {
        return Ok(());
    };
    match command {
        Commands::Init(_) => unreachable!("init is dispatched before workspace loading"),
        Commands::Lists => cmd_lists(&dir, cli.json),
        Commands::Tree(args) => cmd_tree(&dir, args, cli.json),
        Commands::Show(args) => cmd_show(&dir, args, cli.json),
        Commands::Add(args) => cmd_add(&dir, args),
        Commands::Status(args) => {
            mutate(&dir, |ws| entity_ops::set_status(ws, &args.id, args.status))
        }
        Commands::Priority(args) => mutate(&dir, |ws| {
            entity_ops::set_priority(ws, &args.id, args.priority)
        }),
        Commands::Deadline(args) => cmd_deadline(&dir, args),
        Commands::Title(args) => mutate(&dir, |ws| {
            entity_ops::rename(ws, &args.id, args.title.clone())
        }),
        Commands::Desc(args) => mutate(&dir, |ws| {
            entity_ops::set_description(ws, &args.id, args.text.clone())
        }),
        Commands::Mv(args) => mutate(&dir, |ws| {
            entity_ops::move_entity(ws, &args.id, args.parent.as_deref())
        }),
        Commands::Rm(args) => cmd_rm(&dir, args),
        Commands::Search(args) => cmd_search(&dir, args, cli.json),
    }
}

/// Initialize a workspace directory
pub fn cmd_init(dir: &Path, args: &InitArgs) -> Result<(), CliError> {
    if workspace_exists(dir) && !args.force {
        return Err(CliError::Invalid(
            "workspace already initialized (use --force to reset)".to_string(),
        ));
    }
    let name = args.name.clone().unwrap_or_else(|| {
        dir.canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "workspace".to_string())
    });
    let mut config = WorkspaceConfig::default();
    config.workspace.name = name.clone();
    write_config(dir, &config)?;
    save_workspace(dir, &Workspace::new())?;
    println!("initialized workspace '{name}'");
    Ok(())
}

fn mutate(
    dir: &Path,
    f: impl FnOnce(&mut Workspace) -> Result<(), EntityError>,
) -> Result<(), CliError> {
    let mut ws = load_workspace(dir)?;
    f(&mut ws)?;
    save_workspace(dir, &ws)?;
    Ok(())
}

fn cmd_lists(dir: &Path, json: bool) -> Result<(), CliError> {
    let ws = load_workspace(dir)?;
    let flat = flatten_tree(&ws.list_forest());
    if json {
        let out: Vec<output::EntityJson> = flat
            .iter()
            .map(|n| output::EntityJson::from_entity(&n.entity))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }
    for node in &flat {
        let indent = "  ".repeat(node.path.len().saturating_sub(1));
        println!("{indent}# {} {}", node.entity.id, node.entity.title);
    }
    Ok(())
}

fn cmd_tree(dir: &Path, args: &TreeArgs, json: bool) -> Result<(), CliError> {
    let ws = load_workspace(dir)?;
    let config = load_config(dir);
    let settings = ViewSettings {
        sorting: args.sort.unwrap_or(config.defaults.sorting),
        grouping: args.group.unwrap_or(config.defaults.grouping),
        group_recursive: args.group_recursive || config.defaults.group_recursive,
    };

    let (forest, parent_id) = match &args.id {
        Some(id) => {
            if !ws.contains(id) {
                return Err(EntityError::NotFound(id.clone()).into());
            }
            (ws.task_forest(id), id.clone())
        }
        None => (ws.full_forest(), "workspace".to_string()),
    };

    let nodes = materialize_tree(&forest, settings, &parent_id);
    if json {
        output::print_tree_json(&nodes);
    } else {
        output::print_tree(&nodes);
    }
    Ok(())
}

fn cmd_show(dir: &Path, args: &ShowArgs, json: bool) -> Result<(), CliError> {
    let ws = load_workspace(dir)?;
    let entity = ws
        .get(&args.id)
        .ok_or_else(|| EntityError::NotFound(args.id.clone()))?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::EntityJson::from_entity(entity))
                .unwrap_or_default()
        );
        return Ok(());
    }

    let forest = ws.list_forest();
    let task_map = ws.task_tree_map();
    let trail: Vec<String> = trace_entity_including_tasks(&forest, &task_map, &args.id)
        .map(|chain| chain.iter().map(|e| e.title.clone()).collect())
        .unwrap_or_default();
    output::print_entity(entity, &trail);
    Ok(())
}

fn cmd_add(dir: &Path, args: &AddArgs) -> Result<(), CliError> {
    let mut ws = load_workspace(dir)?;
    let id = if args.list {
        entity_ops::create_list(&mut ws, args.title.clone(), args.parent.as_deref())?
    } else {
        let parent = args.parent.as_deref().ok_or_else(|| {
            CliError::Invalid("tasks need a parent (--parent <ID>)".to_string())
        })?;
        entity_ops::create_task(&mut ws, args.title.clone(), parent)?
    };
    save_workspace(dir, &ws)?;
    println!("{id}");
    Ok(())
}

fn cmd_deadline(dir: &Path, args: &DeadlineArgs) -> Result<(), CliError> {
    let deadline = match &args.date {
        None => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| CliError::Invalid(format!("invalid date: {raw} (want YYYY-MM-DD)")))?,
        ),
    };
    mutate(dir, |ws| entity_ops::set_deadline(ws, &args.id, deadline))
}

fn cmd_rm(dir: &Path, args: &RmArgs) -> Result<(), CliError> {
    let mut ws = load_workspace(dir)?;
    let removed = entity_ops::delete_entity(&mut ws, &args.id)?;
    save_workspace(dir, &ws)?;
    println!("removed {removed} entities");
    Ok(())
}

fn cmd_search(dir: &Path, args: &SearchArgs, json: bool) -> Result<(), CliError> {
    let ws = load_workspace(dir)?;
    let re = compile_query(&args.pattern)
        .ok_or_else(|| CliError::Invalid(format!("unusable pattern: {}", args.pattern)))?;
    let hits = search_workspace(&ws, &re);
    output::print_search_hits(&ws, &hits, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_then_reinit_requires_force() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            name: Some("test".into()),
            force: false,
        };
        cmd_init(dir.path(), &args).unwrap();
        assert!(workspace_exists(dir.path()));
        assert!(cmd_init(dir.path(), &args).is_err());

        let forced = InitArgs {
            name: Some("test".into()),
            force: true,
        };
        cmd_init(dir.path(), &forced).unwrap();
    }

    #[test]
    fn mutate_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        cmd_init(
            dir.path(),
            &InitArgs {
                name: None,
                force: false,
            },
        )
        .unwrap();

        let mut ws = load_workspace(dir.path()).unwrap();
        entity_ops::create_list(&mut ws, "Work".into(), None).unwrap();
        entity_ops::create_task(&mut ws, "Report".into(), "L-001").unwrap();
        save_workspace(dir.path(), &ws).unwrap();

        mutate(dir.path(), |ws| {
            entity_ops::rename(ws, "T-001", "Better".into())
        })
        .unwrap();
        let ws = load_workspace(dir.path()).unwrap();
        assert_eq!(ws.get("T-001").unwrap().title, "Better");
    }
}
