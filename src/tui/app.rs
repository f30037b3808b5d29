use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::cli::handlers::CliError;
use crate::io::config_io::load_config;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::workspace_io::{load_workspace, save_workspace};
use crate::model::{FlattenedEntity, ViewSettings, WorkspaceConfig};
use crate::ops::entity_ops::EntityError;
use crate::store::{ToggleStore, Workspace};
use crate::tree::{
    TreePipeline, UiTreeNode, flatten_entity_tree_including_tasks, trace_entity_including_tasks,
};

use super::input;
use super::render;
use super::theme::Theme;

/// Debounce window before changes hit disk
const SAVE_DELAY: Duration = Duration::from_millis(400);

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Main,
}

pub struct App {
    pub dir: PathBuf,
    pub workspace: Workspace,
    pub config: WorkspaceConfig,
    pub theme: Theme,

    pub pane: Pane,
    pub sidebar_cursor: usize,
    pub sidebar_scroll: usize,
    pub main_cursor: usize,
    pub main_scroll: usize,

    /// List (or task) whose subtree fills the main pane
    pub selected: Option<String>,
    pub pipeline: TreePipeline,
    pub expanded: ToggleStore,
    pub description_expanded: ToggleStore,
    pub sidebar_expanded: ToggleStore,

    pub status_message: Option<String>,
    pub should_quit: bool,
    workspace_dirty: bool,
    state_dirty: bool,
    last_change: Option<Instant>,
}

impl App {
    pub fn new(dir: &Path) -> Result<App, CliError> {
        let workspace = load_workspace(dir)?;
        let config = load_config(dir);
        let theme = Theme::from_config(&config.ui);

        let mut app = App {
            dir: dir.to_path_buf(),
            workspace,
            theme,
            pane: Pane::Sidebar,
            sidebar_cursor: 0,
            sidebar_scroll: 0,
            main_cursor: 0,
            main_scroll: 0,
            selected: None,
            pipeline: TreePipeline::new("workspace"),
            expanded: ToggleStore::new(config.ui.expand_tasks),
            description_expanded: ToggleStore::new(false),
            sidebar_expanded: ToggleStore::new(config.ui.expand_sidebar),
            status_message: None,
            should_quit: false,
            workspace_dirty: false,
            state_dirty: false,
            last_change: None,
            config,
        };
        app.pipeline.set_settings(app.config.defaults);
        app.restore_ui_state();

        if app.selected.is_none() {
            let first = app
                .workspace
                .iter()
                .find(|e| e.is_list())
                .map(|e| e.id.clone());
            if let Some(id) = first {
                app.select(&id);
            }
        }
        Ok(app)
    }

    // -----------------------------------------------------------------
    // State persistence
    // -----------------------------------------------------------------

    fn restore_ui_state(&mut self) {
        let Some(state) = read_ui_state(&self.dir) else {
            return;
        };
        self.pipeline.set_settings(state.view_settings);
        self.expanded = ToggleStore::from_entries(self.config.ui.expand_tasks, state.expanded);
        self.description_expanded = ToggleStore::from_entries(false, state.description_expanded);
        self.sidebar_expanded =
            ToggleStore::from_entries(self.config.ui.expand_sidebar, state.sidebar_expanded);
        self.main_scroll = state.scroll_offset;
        if let Some(id) = state.active_entity {
            if self.workspace.contains(&id) {
                self.select(&id);
            }
        }
    }

    fn save_ui_state(&self) {
        let mut state = UiState::capture(
            self.pipeline.settings(),
            &self.expanded,
            &self.description_expanded,
            &self.sidebar_expanded,
        );
        state.active_entity = self.selected.clone();
        state.scroll_offset = self.main_scroll;
        // State is a convenience; losing it is not fatal
        let _ = write_ui_state(&self.dir, &state);
    }

    pub fn mark_workspace_changed(&mut self) {
        self.workspace_dirty = true;
        self.last_change = Some(Instant::now());
        self.refresh_tree();
    }

    pub fn mark_state_changed(&mut self) {
        self.state_dirty = true;
        self.last_change = Some(Instant::now());
    }

    /// Flush pending changes once the debounce window has elapsed
    fn maybe_flush(&mut self) -> Result<(), CliError> {
        let Some(changed_at) = self.last_change else {
            return Ok(());
        };
        if changed_at.elapsed() < SAVE_DELAY {
            return Ok(());
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<(), CliError> {
        if self.workspace_dirty {
            save_workspace(&self.dir, &self.workspace)?;
            self.workspace_dirty = false;
        }
        if self.state_dirty {
            self.save_ui_state();
            self.state_dirty = false;
        }
        self.last_change = None;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------

    /// Sidebar rows: every list with its task subtree spliced in,
    /// filtered down to nodes whose ancestors are all expanded.
    pub fn sidebar_nodes(&self) -> Vec<FlattenedEntity> {
        let forest = self.workspace.list_forest();
        let task_map = self.workspace.task_tree_map();
        flatten_entity_tree_including_tasks(&forest, &task_map)
            .into_iter()
            .filter(|node| {
                let ancestors = &node.path[..node.path.len().saturating_sub(1)];
                ancestors.iter().all(|id| self.sidebar_expanded.get(id))
            })
            .collect()
    }

    pub fn main_nodes(&mut self) -> Vec<UiTreeNode> {
        self.pipeline
            .visible_nodes(&self.expanded, &self.description_expanded)
    }

    /// Breadcrumb titles for the selected entity, workspace name first
    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut trail = vec![self.config.workspace.name.clone()];
        if let Some(id) = &self.selected {
            let forest = self.workspace.list_forest();
            let task_map = self.workspace.task_tree_map();
            if let Some(chain) = trace_entity_including_tasks(&forest, &task_map, id) {
                trail.extend(chain.iter().map(|e| e.title.clone()));
            }
        }
        trail
    }

    // -----------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------

    /// Point the main pane at an entity's task subtree
    pub fn select(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            return;
        }
        self.selected = Some(id.to_string());
        let settings = self.pipeline.settings();
        self.pipeline = TreePipeline::new(id);
        self.pipeline.set_settings(settings);
        self.pipeline.set_forest(self.workspace.task_forest(id));
        self.main_cursor = 0;
        self.main_scroll = 0;
        self.mark_state_changed();
    }

    pub fn refresh_tree(&mut self) {
        if let Some(id) = &self.selected {
            self.pipeline.set_forest(self.workspace.task_forest(id));
        }
    }

    pub fn set_view_settings(&mut self, settings: ViewSettings) {
        self.pipeline.set_settings(settings);
        self.mark_state_changed();
    }

    /// Run a workspace mutation, surfacing failures in the status row
    pub fn apply(&mut self, f: impl FnOnce(&mut Workspace) -> Result<(), EntityError>) {
        match f(&mut self.workspace) {
            Ok(()) => self.mark_workspace_changed(),
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    pub fn sidebar_entity_id(&self) -> Option<String> {
        let nodes = self.sidebar_nodes();
        nodes.get(self.sidebar_cursor).map(|n| n.entity.id.clone())
    }

    pub fn main_node_id(&mut self) -> Option<String> {
        let cursor = self.main_cursor;
        self.main_nodes().get(cursor).map(|n| n.id.clone())
    }

    /// The real entity under the main cursor, skipping group headers
    pub fn main_entity_id(&mut self) -> Option<String> {
        let cursor = self.main_cursor;
        self.main_nodes()
            .get(cursor)
            .and_then(|n| n.entity().map(|e| e.id.clone()))
    }
}

// ---------------------------------------------------------------------------
// Terminal lifecycle
// ---------------------------------------------------------------------------

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, std::io::Error> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(out))
}

fn restore_terminal() -> Result<(), std::io::Error> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the interactive TUI against the workspace in `dir`
pub fn run(dir: &Path) -> Result<(), CliError> {
    let mut app = App::new(dir)?;

    // Restore the terminal even if a draw panics
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal()?;

    app.flush()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    while !app.should_quit {
        terminal.draw(|frame| render::draw(frame, app))?;
        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    input::handle_key(app, key);
                }
            }
        }
        app.maybe_flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::entity_ops;
    use tempfile::TempDir;

    fn seeded_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::new();
        entity_ops::create_list(&mut ws, "Work".into(), None).unwrap();
        entity_ops::create_task(&mut ws, "Report".into(), "L-001").unwrap();
        entity_ops::create_task(&mut ws, "Outline".into(), "T-001").unwrap();
        save_workspace(dir.path(), &ws).unwrap();
        dir
    }

    #[test]
    fn new_selects_first_list() {
        let dir = seeded_dir();
        let app = App::new(dir.path()).unwrap();
        assert_eq!(app.selected.as_deref(), Some("L-001"));
    }

    #[test]
    fn sidebar_hides_collapsed_descendants() {
        let dir = seeded_dir();
        let app = App::new(dir.path()).unwrap();
        let nodes = app.sidebar_nodes();
        let ids: Vec<&str> = nodes
            .iter()
            .map(|n| n.entity.id.as_str())
            .collect();
        // expand_sidebar defaults false, so only roots show
        assert_eq!(ids, vec!["L-001"]);
    }

    #[test]
    fn expanding_sidebar_reveals_children() {
        let dir = seeded_dir();
        let mut app = App::new(dir.path()).unwrap();
        app.sidebar_expanded.set("L-001", true);
        let nodes = app.sidebar_nodes();
        let ids: Vec<&str> = nodes
            .iter()
            .map(|n| n.entity.id.as_str())
            .collect();
        assert_eq!(ids, vec!["L-001", "T-001"]);
    }

    #[test]
    fn main_pane_shows_selected_subtree() {
        let dir = seeded_dir();
        let mut app = App::new(dir.path()).unwrap();
        let ids: Vec<String> = app.main_nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["T-001", "T-002"]);
    }

    #[test]
    fn breadcrumbs_trace_from_workspace_root() {
        let dir = seeded_dir();
        let mut app = App::new(dir.path()).unwrap();
        app.select("T-002");
        let crumbs = app.breadcrumbs();
        assert_eq!(crumbs[1..], ["Work", "Report", "Outline"]);
    }

    #[test]
    fn mutation_refreshes_main_pane() {
        let dir = seeded_dir();
        let mut app = App::new(dir.path()).unwrap();
        app.apply(|ws| entity_ops::create_task(ws, "Second".into(), "L-001").map(|_| ()));
        let ids: Vec<String> = app.main_nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["T-001", "T-002", "T-003"]);
    }

    #[test]
    fn failed_mutation_sets_status_message() {
        let dir = seeded_dir();
        let mut app = App::new(dir.path()).unwrap();
        app.apply(|ws| entity_ops::rename(ws, "T-999", "x".into()));
        assert!(app.status_message.is_some());
    }
}
