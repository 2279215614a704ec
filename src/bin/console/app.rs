//! Main application state and event handling
//!
//! The App brings together:
//! - the source editor and the output panels (the two viewers)
//! - the latest [ConsoleState] published by the run controller
//! - focus management and the global keys
//!
//! The App never talks to the compilation service itself. Keys that need the
//! outside world come back from [App::handle_key] as an [Action] for the event
//! loop to carry out.

use super::editor::Editor;
use super::panels::OutputPanels;
use super::theme::Theme;
use super::viewer::{Viewer, ViewerEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lql::lql::controller::ConsoleState;
use lql::lql::samples::Samples;
use std::path::PathBuf;

/// Which viewer receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Panels,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Editor => Focus::Panels,
            Focus::Panels => Focus::Editor,
        }
    }
}

/// Work the event loop has to do on behalf of the App
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit this source to the compilation service
    Run(String),
}

pub struct App {
    pub editor: Editor,
    pub panels: OutputPanels,
    pub state: ConsoleState,
    pub focus: Focus,
    pub theme: Theme,
    pub should_quit: bool,
    /// Shown in the header, either the file name or the sample name
    pub source_name: String,
    /// One-line message in the footer (save result, ignored run, ...)
    pub notice: Option<String>,
    path: Option<PathBuf>,
    sample: Option<usize>,
}

impl App {
    /// App editing the file at `path`, whose current content is `source`
    pub fn with_file(path: PathBuf, source: &str, tab_width: usize) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("untitled")
            .to_string();
        let mut app = Self::new(source, name, tab_width);
        app.path = Some(path);
        app
    }

    /// App on the default sample program
    pub fn with_default_program(tab_width: usize) -> Self {
        let mut app = Self::new(Samples::default_program(), "default".to_string(), tab_width);
        app.sample = Some(0);
        app
    }

    fn new(source: &str, source_name: String, tab_width: usize) -> Self {
        App {
            editor: Editor::new(source, tab_width),
            panels: OutputPanels::new(),
            state: ConsoleState::default(),
            focus: Focus::default(),
            theme: Theme::default(),
            should_quit: false,
            source_name,
            notice: None,
            path: None,
            sample: None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Take a newly published controller state
    pub fn apply_state(&mut self, state: ConsoleState) {
        if state.generation != self.state.generation {
            self.panels.reset_scroll();
        }
        self.state = state;
    }

    /// Handle a keyboard event, returning work for the event loop if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                None
            }
            KeyCode::F(5) => self.request_run(),
            KeyCode::Char('r') if ctrl => self.request_run(),
            KeyCode::Char('s') if ctrl => {
                self.save();
                None
            }
            KeyCode::F(2) => {
                self.next_sample();
                None
            }
            KeyCode::Tab if self.focus == Focus::Panels => {
                self.toggle_focus();
                None
            }
            KeyCode::Esc | KeyCode::BackTab => {
                self.toggle_focus();
                None
            }
            _ => {
                let event = match self.focus {
                    Focus::Editor => self.editor.handle_key(key),
                    Focus::Panels => self.panels.handle_key(key),
                };
                if event == ViewerEvent::Edited {
                    self.notice = None;
                }
                None
            }
        }
    }

    /// A new run, unless one is still in flight
    fn request_run(&mut self) -> Option<Action> {
        if self.state.loading {
            log::debug!("run ignored, previous run still compiling");
            return None;
        }
        self.notice = None;
        Some(Action::Run(self.editor.text()))
    }

    fn next_sample(&mut self) {
        let samples = Samples::all();
        let next = self.sample.map_or(0, |index| (index + 1) % samples.len());
        let sample = &samples[next];
        self.editor.set_text(sample.source);
        self.sample = Some(next);
        self.path = None;
        self.source_name = sample.name.to_string();
        self.notice = None;
    }

    fn save(&mut self) {
        let Some(path) = &self.path else {
            self.notice = Some("Nothing to save: no file was opened".to_string());
            return;
        };
        self.notice = Some(match std::fs::write(path, self.editor.text()) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("Save failed: {}", e),
        });
    }
}
