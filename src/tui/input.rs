use crossterm::event::{KeyCode, KeyEvent};

use crate::model::TaskPriority;
use crate::ops::entity_ops;
use crate::tui::app::{App, Pane};

/// Cycle order for the priority key, lowest to highest and back
fn next_priority(priority: TaskPriority) -> TaskPriority {
    match priority {
        TaskPriority::None => TaskPriority::Medium,
        TaskPriority::Medium => TaskPriority::High,
        TaskPriority::High => TaskPriority::Urgent,
        TaskPriority::Urgent => TaskPriority::Optional,
        TaskPriority::Optional => TaskPriority::None,
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    app.status_message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => {
            app.pane = match app.pane {
                Pane::Sidebar => Pane::Main,
                Pane::Main => Pane::Sidebar,
            };
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') => {
            let mut settings = app.pipeline.settings();
            settings.grouping = settings.grouping.next();
            app.set_view_settings(settings);
        }
        KeyCode::Char('o') => {
            let mut settings = app.pipeline.settings();
            settings.sorting = settings.sorting.next();
            app.set_view_settings(settings);
        }
        KeyCode::Char('r') => {
            let mut settings = app.pipeline.settings();
            settings.group_recursive = !settings.group_recursive;
            app.set_view_settings(settings);
        }
        KeyCode::Enter => activate(app),
        KeyCode::Char(' ') => toggle_expand(app),
        KeyCode::Char('d') => toggle_description(app),
        KeyCode::Char('s') => cycle_status(app),
        KeyCode::Char('p') => bump_priority(app),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: i32) {
    let len = match app.pane {
        Pane::Sidebar => app.sidebar_nodes().len(),
        Pane::Main => app.main_nodes().len(),
    };
    if len == 0 {
        return;
    }
    let cursor = match app.pane {
        Pane::Sidebar => &mut app.sidebar_cursor,
        Pane::Main => &mut app.main_cursor,
    };
    *cursor = (*cursor as i32 + delta).clamp(0, len as i32 - 1) as usize;
}

/// Enter: in the sidebar, open the entity under the cursor in the main
/// pane; in the main pane, toggle expansion like space.
fn activate(app: &mut App) {
    match app.pane {
        Pane::Sidebar => {
            if let Some(id) = app.sidebar_entity_id() {
                app.select(&id);
            }
        }
        Pane::Main => toggle_expand(app),
    }
}

fn toggle_expand(app: &mut App) {
    match app.pane {
        Pane::Sidebar => {
            if let Some(id) = app.sidebar_entity_id() {
                app.sidebar_expanded.toggle(&id);
                app.mark_state_changed();
            }
        }
        Pane::Main => {
            if let Some(id) = app.main_node_id() {
                app.expanded.toggle(&id);
                app.mark_state_changed();
            }
        }
    }
}

fn toggle_description(app: &mut App) {
    if app.pane != Pane::Main {
        return;
    }
    if let Some(id) = app.main_entity_id() {
        app.description_expanded.toggle(&id);
        app.mark_state_changed();
    }
}

fn cycle_status(app: &mut App) {
    if app.pane != Pane::Main {
        return;
    }
    if let Some(id) = app.main_entity_id() {
        app.apply(|ws| entity_ops::cycle_status(ws, &id).map(|_| ()));
    }
}

fn bump_priority(app: &mut App) {
    if app.pane != Pane::Main {
        return;
    }
    let Some(id) = app.main_entity_id() else {
        return;
    };
    let Some(current) = app
        .workspace
        .get(&id)
        .and_then(|e| e.task())
        .map(|t| t.priority)
    else {
        return;
    };
    app.apply(|ws| entity_ops::set_priority(ws, &id, next_priority(current)));
}
