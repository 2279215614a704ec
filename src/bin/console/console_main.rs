//! Event loop of the interactive console
//!
//! Drawing and key handling stay on the main thread. Runs are spawned onto the
//! tokio runtime; their results come back through the controller's watch
//! channel and are picked up before the next frame.

use super::app::{Action, App};
use super::ui;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use lql::lql::client::CompilerService;
use lql::lql::controller::{ConsoleState, RunController};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::watch;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the console until the user quits
pub fn run_console<S>(
    mut app: App,
    controller: Arc<RunController<S>>,
    runtime: &Runtime,
) -> io::Result<()>
where
    S: CompilerService + 'static,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &controller, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    controller: &Arc<RunController<S>>,
    runtime: &Runtime,
) -> io::Result<()>
where
    S: CompilerService + 'static,
{
    let mut updates: watch::Receiver<ConsoleState> = controller.subscribe();

    loop {
        if updates.has_changed().unwrap_or(false) {
            app.apply_state(updates.borrow_and_update().clone());
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        // Resize needs no handling, the next draw picks up the new size.
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(Action::Run(source)) = app.handle_key(key) {
                let controller = Arc::clone(controller);
                runtime.spawn(async move {
                    controller.run(&source).await;
                });
            }
            if app.should_quit {
                return Ok(());
            }
        }
    }
}
