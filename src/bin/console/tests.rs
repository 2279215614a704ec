//! Test infrastructure for the console
//!
//! TestApp drives an [App] through keys and renders it on a ratatui
//! [TestBackend], so assertions can look at what the user would see.

use super::app::{Action, App, Focus};
use super::panels::PLACEHOLDER;
use super::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lql::lql::controller::{ConsoleState, RunStatus};
use lql::lql::normalize::{normalize, ArtifactFormat};
use lql::lql::phase::Phase;
use lql::lql::response::{PhaseArtifacts, PipelineResponse};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::json;

pub struct TestApp {
    app: App,
    terminal: Terminal<TestBackend>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_size(140, 40)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TestApp {
            app: App::with_default_program(4),
            terminal,
        }
    }

    pub fn send_key(&mut self, code: KeyCode) -> Option<Action> {
        self.send_key_with_modifiers(code, KeyModifiers::empty())
    }

    pub fn send_key_with_modifiers(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<Action> {
        self.app.handle_key(KeyEvent::new(code, modifiers))
    }

    /// Render and return the screen, one string per row
    pub fn render(&mut self) -> Vec<String> {
        self.terminal
            .draw(|frame| ui::render(frame, &self.app))
            .unwrap();
        let buffer = self.terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    pub fn screen(&mut self) -> String {
        self.render().join("\n")
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn settled_state(response: PipelineResponse, generation: u64) -> ConsoleState {
    let normalized = normalize(&response, ArtifactFormat::Json);
    ConsoleState {
        status: if normalized.failing_phase.is_some() {
            RunStatus::Failed
        } else {
            RunStatus::Settled
        },
        phases: normalized.model,
        failing_phase: normalized.failing_phase,
        loading: false,
        generation,
    }
}

#[test]
fn test_initial_screen() {
    let mut app = TestApp::new();
    let screen = app.screen();

    assert!(screen.contains(ui::TITLE));
    assert!(screen.contains(ui::TAGLINE));
    assert!(screen.contains("Compilation Pipeline"));
    for phase in Phase::ALL {
        assert!(screen.contains(phase.title()), "missing {}", phase.title());
        assert!(screen.contains(phase.description()));
    }
    assert_eq!(screen.matches(PLACEHOLDER).count(), 6);
    assert!(!screen.contains(ui::LOADING_INDICATOR));
}

#[test]
fn test_editor_shows_source_with_line_numbers() {
    let mut app = TestApp::new();
    let rows = app.render();
    assert!(rows.iter().any(|row| row.contains("1 @ Example Code:")));
    assert!(rows.iter().any(|row| row.contains("2 list data = [1, 2, 3, 4, 5]")));
}

#[test]
fn test_loading_indicator() {
    let mut app = TestApp::new();
    app.app_mut().apply_state(ConsoleState {
        status: RunStatus::Running,
        loading: true,
        generation: 1,
        ..ConsoleState::default()
    });

    assert!(app.screen().contains(ui::LOADING_INDICATOR));
    assert_eq!(app.send_key(KeyCode::F(5)), None);
}

#[test]
fn test_failed_run_is_displayed() {
    let mut app = TestApp::new();
    let response = PipelineResponse::failed(
        Phase::Parser,
        "Expected '=' after identifier",
        PhaseArtifacts::default().with(Phase::Lexer, json!("KEYWORD list")),
    );
    app.app_mut().apply_state(settled_state(response, 1));

    let screen = app.screen();
    assert!(screen.contains("ERROR in parser PHASE"));
    assert!(screen.contains("KEYWORD list"));
    assert!(screen.contains("Expected '=' after identifier"));
    assert_eq!(screen.matches(PLACEHOLDER).count(), 4);
}

#[test]
fn test_successful_run_fills_cards() {
    let mut app = TestApp::new();
    let artifacts = PhaseArtifacts::default()
        .with(Phase::Lexer, json!("tokens"))
        .with(Phase::Parser, json!("ast"))
        .with(Phase::Semantic, json!("symbols"))
        .with(Phase::Tac, json!("t1 = 1"))
        .with(Phase::Optimizer, json!("t1 = 1"))
        .with(Phase::Execution, json!("[1, 4, 9]"));
    app.app_mut()
        .apply_state(settled_state(PipelineResponse::succeeded(artifacts), 1));

    let screen = app.screen();
    assert!(!screen.contains(PLACEHOLDER));
    assert!(screen.contains("[1, 4, 9]"));
    assert!(!screen.contains("ERROR in"));
}

#[test]
fn test_new_run_resets_panel_scroll() {
    let mut app = TestApp::new();
    app.send_key(KeyCode::Esc);
    assert_eq!(app.app().focus, Focus::Panels);
    app.send_key(KeyCode::PageDown);
    assert_eq!(app.app().panels.scroll_offset(Phase::Lexer), 5);

    app.app_mut().apply_state(ConsoleState {
        generation: 1,
        loading: true,
        ..ConsoleState::default()
    });
    assert_eq!(app.app().panels.scroll_offset(Phase::Lexer), 0);
}

#[test]
fn test_typing_then_running() {
    let mut app = TestApp::new();
    app.send_key_with_modifiers(KeyCode::End, KeyModifiers::empty());
    app.send_key(KeyCode::Char('!'));

    match app.send_key(KeyCode::F(5)) {
        Some(Action::Run(source)) => assert!(source.starts_with("@ Example Code:!\n")),
        other => panic!("expected a run, got {:?}", other),
    }
}

#[test]
fn test_narrow_terminal() {
    let mut app = TestApp::with_size(60, 20);
    assert!(app.screen().contains("Terminal too narrow: 60 < 80 chars"));
}
