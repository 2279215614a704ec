//! Source editor pane
//!
//! A small line editor over a `Vec<String>`. The cursor column counts chars, not
//! bytes; scrolling and the terminal cursor work in display cells, so wide
//! characters take two. Tabs are expanded to spaces when text is loaded. Every
//! visible line is highlighted by running the tag grammar over it;
//! since the grammar scans line by line, highlighting a line on its own gives the
//! same spans as highlighting the whole buffer.

use super::viewer::{View, Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lql::lql::grammar::classify;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::cell::Cell;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of the line number gutter, including the separating space
const GUTTER_WIDTH: u16 = 5;

#[derive(Debug)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    tab_width: usize,
    /// First visible line, adjusted while rendering
    scroll_row: Cell<usize>,
    /// First visible display cell, adjusted while rendering
    scroll_col: Cell<usize>,
    /// Text rows available at the last render, used for paging
    viewport_height: Cell<usize>,
}

impl Editor {
    pub fn new(text: &str, tab_width: usize) -> Self {
        let mut editor = Editor {
            lines: Vec::new(),
            row: 0,
            col: 0,
            tab_width,
            scroll_row: Cell::new(0),
            scroll_col: Cell::new(0),
            viewport_height: Cell::new(20),
        };
        editor.set_text(text);
        editor
    }

    /// Replace the whole buffer and put the cursor at the top
    pub fn set_text(&mut self, text: &str) {
        self.lines = text
            .replace("\r\n", "\n")
            .split('\n')
            .map(|line| expand_tabs(line, self.tab_width))
            .collect();
        self.row = 0;
        self.col = 0;
        self.scroll_row.set(0);
        self.scroll_col.set(0);
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// `(row, col)` of the cursor, both 0-indexed
    #[allow(dead_code)]
    pub fn cursor_position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[allow(dead_code)]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_index(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(index, _)| index)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    /// Display cells between the line start and the cursor
    fn cursor_cell(&self) -> usize {
        self.lines[self.row][..self.byte_index()].width()
    }

    fn insert_tab(&mut self) {
        let tab_width = self.tab_width.max(1);
        let spaces = tab_width - self.cursor_cell() % tab_width;
        for _ in 0..spaces.max(1) {
            self.insert_char(' ');
        }
    }

    pub fn insert_newline(&mut self) {
        let at = self.byte_index();
        let rest = self.lines[self.row].split_off(at);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, rest);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_index();
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_index();
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_up(&mut self, rows: usize) {
        self.row = self.row.saturating_sub(rows);
        self.col = self.col.min(self.line_len(self.row));
    }

    fn move_down(&mut self, rows: usize) {
        self.row = (self.row + rows).min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    /// Scroll just enough to keep the cursor inside a `height` x `width` viewport
    fn scroll_to_cursor(&self, height: usize, width: usize) {
        let top = self.scroll_row.get();
        if self.row < top {
            self.scroll_row.set(self.row);
        } else if height > 0 && self.row >= top + height {
            self.scroll_row.set(self.row + 1 - height);
        }

        let cell = self.cursor_cell();
        let left = self.scroll_col.get();
        if cell < left {
            self.scroll_col.set(cell);
        } else if width > 0 && cell >= left + width {
            self.scroll_col.set(cell + 1 - width);
        }
    }

    fn highlighted_line<'a>(&self, text: &'a str, view: &View) -> Line<'a> {
        let spans: Vec<Span> = classify(text)
            .map(|tagged| Span::styled(tagged.text, view.theme.editor_token(tagged.category)))
            .collect();
        Line::from(spans)
    }
}

/// Replace each tab with spaces up to the next tab stop
fn expand_tabs(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_width = tab_width.max(1);
    let mut expanded = String::with_capacity(line.len());
    let mut cell = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = tab_width - cell % tab_width;
            expanded.extend(std::iter::repeat(' ').take(spaces));
            cell += spaces;
        } else {
            expanded.push(c);
            cell += c.width().unwrap_or(0);
        }
    }
    expanded
}

impl Viewer for Editor {
    fn render(&self, frame: &mut Frame, area: Rect, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(GUTTER_WIDTH), Constraint::Min(1)])
            .split(area);
        let (gutter, text_area) = (chunks[0], chunks[1]);

        let height = text_area.height as usize;
        self.viewport_height.set(height.max(1));
        self.scroll_to_cursor(height, text_area.width as usize);
        let top = self.scroll_row.get();

        let visible = self.lines.iter().enumerate().skip(top).take(height);
        let numbers: Vec<Line> = visible
            .clone()
            .map(|(row, _)| {
                Line::styled(
                    format!("{:>width$} ", row + 1, width = GUTTER_WIDTH as usize - 1),
                    view.theme.editor_line_number(),
                )
            })
            .collect();
        let text: Vec<Line> = visible
            .map(|(_, line)| self.highlighted_line(line, view))
            .collect();

        frame.render_widget(Paragraph::new(numbers), gutter);
        frame.render_widget(
            Paragraph::new(text).scroll((0, self.scroll_col.get() as u16)),
            text_area,
        );

        if view.focused {
            let x = text_area.x + (self.cursor_cell() - self.scroll_col.get()) as u16;
            let y = text_area.y + (self.row - top) as u16;
            frame.set_cursor_position(Position::new(x, y));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewerEvent {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return ViewerEvent::NoChange;
        }

        let page = self.viewport_height.get();
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                ViewerEvent::Edited
            }
            KeyCode::Enter => {
                self.insert_newline();
                ViewerEvent::Edited
            }
            KeyCode::Tab => {
                self.insert_tab();
                ViewerEvent::Edited
            }
            KeyCode::Backspace => {
                self.backspace();
                ViewerEvent::Edited
            }
            KeyCode::Delete => {
                self.delete();
                ViewerEvent::Edited
            }
            KeyCode::Up => {
                self.move_up(1);
                ViewerEvent::Moved
            }
            KeyCode::Down => {
                self.move_down(1);
                ViewerEvent::Moved
            }
            KeyCode::Left => {
                self.move_left();
                ViewerEvent::Moved
            }
            KeyCode::Right => {
                self.move_right();
                ViewerEvent::Moved
            }
            KeyCode::Home => {
                self.col = 0;
                ViewerEvent::Moved
            }
            KeyCode::End => {
                self.col = self.line_len(self.row);
                ViewerEvent::Moved
            }
            KeyCode::PageUp => {
                self.move_up(page);
                ViewerEvent::Moved
            }
            KeyCode::PageDown => {
                self.move_down(page);
                ViewerEvent::Moved
            }
            _ => ViewerEvent::NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::theme::Theme;
    use lql::lql::controller::ConsoleState;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_text_round_trips() {
        let editor = Editor::new("list a = [1]\nprint a\n", 4);
        assert_eq!(editor.line_count(), 3);
        assert_eq!(editor.text(), "list a = [1]\nprint a\n");
    }

    #[test]
    fn test_crlf_is_normalized() {
        let editor = Editor::new("print a\r\nprint b", 4);
        assert_eq!(editor.text(), "print a\nprint b");
    }

    #[test]
    fn test_typing_and_newline() {
        let mut editor = Editor::new("", 4);
        for c in "print".chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
        editor.handle_key(key(KeyCode::Enter));
        editor.handle_key(key(KeyCode::Char('x')));
        assert_eq!(editor.text(), "print\nx");
        assert_eq!(editor.cursor_position(), (1, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::new("ab\ncd", 4);
        editor.handle_key(key(KeyCode::Down));
        assert_eq!(editor.handle_key(key(KeyCode::Backspace)), ViewerEvent::Edited);
        assert_eq!(editor.text(), "abcd");
        assert_eq!(editor.cursor_position(), (0, 2));
    }

    #[test]
    fn test_delete_at_line_end_joins_next() {
        let mut editor = Editor::new("ab\ncd", 4);
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Delete));
        assert_eq!(editor.text(), "abcd");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut editor = Editor::new("é1", 4);
        editor.handle_key(key(KeyCode::Right));
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.text(), "1");
    }

    #[test]
    fn test_tab_inserts_spaces_to_next_stop() {
        let mut editor = Editor::new("ab", 4);
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Tab));
        assert_eq!(editor.text(), "ab  ");
    }

    #[test]
    fn test_tabs_expand_to_stops_on_load() {
        let editor = Editor::new("\tx\nab\tc\n日\td", 4);
        assert_eq!(editor.text(), "    x\nab  c\n日  d");
    }

    #[test]
    fn test_tab_stop_counts_display_cells() {
        let mut editor = Editor::new("日本", 4);
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Tab));
        assert_eq!(editor.text(), "日本    ");
    }

    #[test]
    fn test_cursor_follows_wide_characters() {
        let mut editor = Editor::new("日本x", 4);
        editor.handle_key(key(KeyCode::End));
        assert_eq!(editor.cursor_position(), (0, 3));
        assert_eq!(editor.cursor_cell(), 5);

        let theme = Theme::default();
        let state = ConsoleState::default();
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        terminal
            .draw(|frame| {
                let view = View {
                    state: &state,
                    theme: &theme,
                    focused: true,
                };
                editor.render(frame, frame.area(), &view);
            })
            .unwrap();
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(GUTTER_WIDTH + 5, 0)
        );
    }

    #[test]
    fn test_horizontal_scroll_counts_display_cells() {
        let mut editor = Editor::new(&"日".repeat(10), 4);
        editor.handle_key(key(KeyCode::End));
        editor.scroll_to_cursor(5, 8);
        assert_eq!(editor.scroll_col.get(), 13);
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut editor = Editor::new("long line\nab", 4);
        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (1, 2));
        editor.handle_key(key(KeyCode::Down));
        assert_eq!(editor.cursor_position(), (1, 2));
    }

    #[test]
    fn test_control_keys_are_not_text() {
        let mut editor = Editor::new("", 4);
        let event = editor.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(event, ViewerEvent::NoChange);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let editor = {
            let mut editor = Editor::new(&"x\n".repeat(30), 4);
            editor.move_down(25);
            editor
        };
        editor.scroll_to_cursor(10, 40);
        assert_eq!(editor.scroll_row.get(), 16);
    }
}
