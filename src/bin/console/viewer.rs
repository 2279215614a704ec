//! Viewer trait and event types
//!
//! The console has two viewers, the source editor and the output panels. Both
//! render from the shared [View] and interpret keys on their own; the App only
//! routes keys to whichever one has focus.

use super::theme::Theme;
use crossterm::event::KeyEvent;
use lql::lql::controller::ConsoleState;
use ratatui::layout::Rect;
use ratatui::Frame;

/// What a key did to a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The source text changed
    Edited,
    /// Cursor, selection or scroll position changed
    Moved,
    /// The key means nothing to this viewer
    NoChange,
}

/// Everything a viewer may read while rendering
pub struct View<'a> {
    pub state: &'a ConsoleState,
    pub theme: &'a Theme,
    pub focused: bool,
}

pub trait Viewer {
    fn render(&self, frame: &mut Frame, area: Rect, view: &View);

    fn handle_key(&mut self, key: KeyEvent) -> ViewerEvent;
}
