use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::model::{FlattenedEntity, TaskPriority};
use crate::tree::{UiNodeContent, UiTreeNode};
use crate::tui::app::{App, Pane};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(1)])
        .split(rows[1]);

    draw_breadcrumbs(frame, app, rows[0]);
    draw_sidebar(frame, app, columns[0]);
    draw_main(frame, app, columns[1]);
    draw_status_row(frame, app, rows[2]);
}

/// Clamp the scroll offset so the cursor stays on screen
fn clamp_scroll(cursor: usize, scroll: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + height {
        cursor + 1 - height
    } else {
        scroll
    }
}

/// Trim a string to a display width, appending an ellipsis when cut
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let budget = width.saturating_sub(1);
    for ch in text.chars() {
        let candidate_width = out.width() + ch.to_string().width();
        if candidate_width > budget {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

fn priority_marker(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Urgent => "!!",
        TaskPriority::High => "!",
        TaskPriority::Medium => "*",
        TaskPriority::None => "",
        TaskPriority::Optional => "?",
    }
}

fn draw_breadcrumbs(frame: &mut Frame, app: &App, area: Rect) {
    let trail = app.breadcrumbs().join(" > ");
    let line = Line::from(Span::styled(
        truncate_to_width(&trail, area.width as usize),
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn sidebar_line<'a>(app: &App, node: &FlattenedEntity, width: usize) -> Line<'a> {
    let depth = node.path.len().saturating_sub(1);
    let indent = "  ".repeat(depth);
    let marker = if node.children_count == 0 {
        "  "
    } else if app.sidebar_expanded.get(&node.entity.id) {
        "▾ "
    } else {
        "▸ "
    };
    let glyph = if node.entity.is_list() { "# " } else { "" };
    let text = truncate_to_width(
        &format!("{indent}{marker}{glyph}{}", node.entity.title),
        width,
    );
    let style = if Some(node.entity.id.as_str()) == app.selected.as_deref() {
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else if node.entity.is_list() {
        Style::default().fg(app.theme.text)
    } else {
        Style::default().fg(app.theme.dim)
    };
    Line::from(Span::styled(text, style))
}

fn draw_sidebar(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.pane == Pane::Sidebar;
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(if focused {
            app.theme.highlight
        } else {
            app.theme.dim
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let nodes = app.sidebar_nodes();
    if !nodes.is_empty() {
        app.sidebar_cursor = app.sidebar_cursor.min(nodes.len() - 1);
    }
    let height = inner.height as usize;
    app.sidebar_scroll = clamp_scroll(app.sidebar_cursor, app.sidebar_scroll, height);

    let mut lines = Vec::with_capacity(height);
    for (row, node) in nodes.iter().enumerate().skip(app.sidebar_scroll).take(height) {
        let mut line = sidebar_line(app, node, inner.width as usize);
        if focused && row == app.sidebar_cursor {
            line = line.style(Style::default().bg(app.theme.selection_bg));
        }
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn main_line<'a>(app: &App, node: &UiTreeNode, width: usize) -> Vec<Line<'a>> {
    let indent = "  ".repeat(node.indent_level());
    match &node.content {
        UiNodeContent::GroupHeader(header) => {
            let text = format!("{indent}{} {}", header.icon, header.label);
            vec![Line::from(Span::styled(
                truncate_to_width(&text, width),
                Style::default()
                    .fg(app.theme.cyan)
                    .add_modifier(Modifier::BOLD),
            ))]
        }
        UiNodeContent::Entity(entity) => {
            let mut spans = Vec::new();
            match entity.task() {
                Some(detail) => {
                    spans.push(Span::styled(
                        format!("{indent}[{}] ", detail.status.checkbox_char()),
                        Style::default().fg(app.theme.status_color(detail.status)),
                    ));
                    let marker = priority_marker(detail.priority);
                    if !marker.is_empty() {
                        spans.push(Span::styled(
                            format!("{marker} "),
                            Style::default().fg(app.theme.priority_color(detail.priority)),
                        ));
                    }
                    let style = if detail.status.is_closed() {
                        Style::default()
                            .fg(app.theme.dim)
                            .add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(app.theme.text)
                    };
                    spans.push(Span::styled(
                        truncate_to_width(&entity.title, width),
                        style,
                    ));
                    if let Some(deadline) = detail.deadline {
                        spans.push(Span::styled(
                            format!("  {deadline}"),
                            Style::default().fg(app.theme.yellow),
                        ));
                    }
                }
                None => {
                    spans.push(Span::styled(
                        format!("{indent}# {}", truncate_to_width(&entity.title, width)),
                        Style::default()
                            .fg(app.theme.text_bright)
                            .add_modifier(Modifier::BOLD),
                    ));
                }
            }
            let mut lines = vec![Line::from(spans)];
            if node.is_description_expanded {
                if let Some(description) = entity.description() {
                    for raw in description.lines() {
                        lines.push(Line::from(Span::styled(
                            truncate_to_width(&format!("{indent}    {raw}"), width),
                            Style::default().fg(app.theme.dim),
                        )));
                    }
                }
            }
            lines
        }
    }
}

fn draw_main(frame: &mut Frame, app: &mut App, area: Rect) {
    let nodes = app.main_nodes();
    if !nodes.is_empty() {
        app.main_cursor = app.main_cursor.min(nodes.len() - 1);
    }
    let height = area.height as usize;
    app.main_scroll = clamp_scroll(app.main_cursor, app.main_scroll, height);
    let focused = app.pane == Pane::Main;

    let mut lines = Vec::with_capacity(height);
    for (row, node) in nodes.iter().enumerate().skip(app.main_scroll) {
        if lines.len() >= height {
            break;
        }
        let mut node_lines = main_line(app, node, area.width as usize);
        if focused && row == app.main_cursor {
            node_lines = node_lines
                .into_iter()
                .map(|line| line.style(Style::default().bg(app.theme.selection_bg)))
                .collect();
        }
        lines.extend(node_lines);
    }
    lines.truncate(height);
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let settings = app.pipeline.settings();
    let text = match &app.status_message {
        Some(message) => message.clone(),
        None => format!(
            " sort:{}  group:{}{}   q:quit tab:pane space:fold s:status p:priority g:group o:sort",
            settings.sorting.label(),
            settings.grouping.label(),
            if settings.group_recursive { "+rec" } else { "" },
        ),
    };
    let style = if app.status_message.is_some() {
        Style::default().fg(app.theme.red)
    } else {
        Style::default().fg(app.theme.dim)
    };
    let line = Line::from(Span::styled(
        truncate_to_width(&text, area.width as usize),
        style,
    ));
    frame.render_widget(Paragraph::new(line), area);
}
