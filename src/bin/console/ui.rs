//! UI rendering logic
//!
//! Layout structure:
//! - Header (2 lines: name and tagline)
//! - Middle section:
//!   - Editor (left)
//!   - Compilation pipeline (right): status line over the six output cards
//! - Footer (1 line, key hints or the current notice)

use super::app::{App, Focus};
use super::viewer::{View, Viewer};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Minimum terminal width required for the UI
pub const MIN_TERMINAL_WIDTH: u16 = 80;
const HEADER_HEIGHT: u16 = 2;
const EDITOR_PERCENT: u16 = 40;

pub const TITLE: &str = "List Query Language";
pub const TAGLINE: &str = "Compile, analyze, and optimize your LQL code in real-time";
pub const LOADING_INDICATOR: &str = "● Compiling...";
const KEY_HINTS: &str = "F5 run · Esc focus · F2 next sample · Ctrl+S save · Ctrl+Q quit";

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(frame, chunks[0], app);
    render_middle_section(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect, app: &App) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    frame.render_widget(Paragraph::new(msg).style(app.theme.error_message()), area);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", TITLE), theme.header_title()),
            Span::raw(format!("  {}", app.source_name)),
        ]),
        Line::styled(format!(" {}", TAGLINE), theme.header_tagline()),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_middle_section(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_PERCENT),
            Constraint::Percentage(100 - EDITOR_PERCENT),
        ])
        .split(area);

    render_editor(frame, chunks[0], app);
    render_pipeline(frame, chunks[1], app);
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor;
    let border = if focused {
        app.theme.focused_border()
    } else {
        app.theme.border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" LQL Editor ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view = View {
        state: &app.state,
        theme: &app.theme,
        focused,
    };
    app.editor.render(frame, inner, &view);
}

/// `Compilation Pipeline`, the failing phase banner and the loading indicator
pub fn status_line(app: &App) -> Line<'static> {
    let theme = &app.theme;
    let mut spans = vec![Span::styled("Compilation Pipeline", theme.status_label())];
    if let Some(banner) = app.state.error_banner() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(banner, theme.status_error()));
    }
    if app.state.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(LOADING_INDICATOR, theme.status_loading()));
    }
    Line::from(spans)
}

fn render_pipeline(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    frame.render_widget(Paragraph::new(status_line(app)), chunks[0]);

    let view = View {
        state: &app.state,
        theme: &app.theme,
        focused: app.focus == Focus::Panels,
    };
    app.panels.render(frame, chunks[1], &view);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => Line::raw(format!(" {}", notice)),
        None => Line::styled(format!(" {}", KEY_HINTS), app.theme.status_hint()),
    };
    frame.render_widget(Paragraph::new(line), area);
}
