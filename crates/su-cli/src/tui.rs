use su_api::Session;
use su_core::SchemaUiError;

#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(session: &mut Session) -> Result<i32, SchemaUiError> {
    super::run_tui_line_mode(session)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use su_api::Session;
    use su_core::SchemaUiError;
    use tracing::info;

    use crate::map_tui_io;
    use crate::tui_actions::handle_key;
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;

    const TICK_MS: u64 = 50;

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, SchemaUiError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run_tui_ratatui_mode(session: &mut Session) -> Result<i32, SchemaUiError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState::new();
        if session.rendered().is_some() {
            ui.editing_prompt = false;
        }
        info!("terminal ui started");

        let tick = Duration::from_millis(TICK_MS);
        loop {
            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &ui, session))
                .map_err(map_tui_io)?;

            if let Err(error) = ui.tick(Instant::now(), session) {
                ui.status = error.message;
            }

            if !event::poll(tick).map_err(map_tui_io)? {
                continue;
            }

            let evt = event::read().map_err(map_tui_io)?;
            if let Event::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let should_quit = match handle_key(key, session, &mut ui, Instant::now()) {
                    Ok(should_quit) => should_quit,
                    Err(error) => {
                        ui.status = error.message;
                        false
                    }
                };
                if should_quit {
                    break;
                }
            }
        }

        info!("terminal ui stopped");
        Ok(0)
    }
}

#[cfg(not(coverage))]
pub(super) fn run_tui_ratatui_mode(session: &mut Session) -> Result<i32, SchemaUiError> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return super::run_tui_line_mode(session);
    }
    rich::run_tui_ratatui_mode(session)
}
