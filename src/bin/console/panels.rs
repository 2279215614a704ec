//! Output panels: one card per pipeline phase, laid out in pipeline order on a
//! two-column grid.

use super::viewer::{View, Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent};
use lql::lql::phase::Phase;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Shown in a card whose phase has nothing to display
pub const PLACEHOLDER: &str = "Run code to see output";

const COLUMNS: usize = 2;
const SCROLL_STEP: u16 = 5;

#[derive(Debug, Default)]
pub struct OutputPanels {
    selected: usize,
    scroll: [u16; 6],
}

impl OutputPanels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The card keyboard scrolling applies to
    pub fn selected(&self) -> Phase {
        Phase::ALL[self.selected]
    }

    #[allow(dead_code)]
    pub fn select(&mut self, phase: Phase) {
        self.selected = phase.index();
    }

    pub fn scroll_offset(&self, phase: Phase) -> u16 {
        self.scroll[phase.index()]
    }

    /// Back to the top of every card, used when a new run starts
    pub fn reset_scroll(&mut self) {
        self.scroll = [0; 6];
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, phase: Phase, view: &View) {
        let theme = view.theme;
        let border = if view.state.failing_phase == Some(phase) {
            theme.failed_border()
        } else if view.focused && self.selected() == phase {
            theme.focused_border()
        } else {
            theme.border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::styled(format!(" {} ", phase.title()), theme.panel_title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(phase.description()).style(theme.panel_description()),
            chunks[0],
        );

        let content = view.state.phases.get(phase);
        let body = if content.is_empty() {
            Paragraph::new(PLACEHOLDER).style(theme.panel_placeholder())
        } else {
            Paragraph::new(content)
                .style(theme.panel_content())
                .scroll((self.scroll_offset(phase), 0))
        };
        frame.render_widget(body, chunks[1]);
    }
}

impl Viewer for OutputPanels {
    fn render(&self, frame: &mut Frame, area: Rect, view: &View) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        for (row, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2); COLUMNS])
                .split(*row_area);
            for (column, cell) in cells.iter().enumerate() {
                let phase = Phase::ALL[row * COLUMNS + column];
                self.render_card(frame, *cell, phase, view);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewerEvent {
        let last = Phase::ALL.len() - 1;
        let scroll = &mut self.scroll[self.selected];
        match key.code {
            KeyCode::Left if self.selected > 0 => self.selected -= 1,
            KeyCode::Right if self.selected < last => self.selected += 1,
            KeyCode::Up if self.selected >= COLUMNS => self.selected -= COLUMNS,
            KeyCode::Down if self.selected + COLUMNS <= last => self.selected += COLUMNS,
            KeyCode::PageUp => *scroll = scroll.saturating_sub(SCROLL_STEP),
            KeyCode::PageDown => *scroll = scroll.saturating_add(SCROLL_STEP),
            KeyCode::Home => *scroll = 0,
            _ => return ViewerEvent::NoChange,
        }
        ViewerEvent::Moved
    }
}
