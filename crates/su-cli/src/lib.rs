use std::ffi::OsString;

use clap::Parser;
use su_api::Session;
use su_core::SchemaUiError;
use tracing::warn;

mod agent;
mod cli_args;
mod error_map;
mod layout;
mod line_tui;
mod logging;
mod models;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use cli_args::{AgentArgs, Cli, Mode, TuiArgs};
pub(crate) use error_map::{emit_error, map_cli_log_file, map_cli_output, map_tui_io};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use logging::init_logging;
pub(crate) use models::{LogTarget, TuiCommandAction};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, SchemaUiError> {
    match cli.command {
        Mode::Agent(args) => {
            init_logging(&LogTarget::Stderr)?;
            agent::run_agent(args)
        }
        Mode::Tui(args) => run_tui(args),
    }
}

fn tui_log_target(args: &TuiArgs) -> LogTarget {
    match (&args.log_file, args.line) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Discard,
    }
}

fn run_tui(args: TuiArgs) -> Result<i32, SchemaUiError> {
    init_logging(&tui_log_target(&args))?;

    let mut session = Session::new();
    if let Some(prompt) = args.prompt.as_deref() {
        if session.submit_prompt(prompt)?.is_none() {
            warn!(prompt, "initial prompt matched no app");
        }
    }

    if args.line {
        run_tui_line_mode(&mut session)
    } else {
        tui::run_tui_ratatui_mode(&mut session)
    }
}

#[cfg(test)]
mod tests;
