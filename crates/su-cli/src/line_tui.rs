use std::io::{self, BufRead, Write};

use su_api::{Session, EXAMPLE_PROMPTS};
use su_core::SchemaUiError;

use crate::layout::{layout_tree, line_text, LayoutOptions};
use crate::{map_tui_io, TuiCommandAction};

const HELP_TEXT: &str =
    "commands: :help :examples :prompt TEXT :quit | click N | press LABEL | type N TEXT";

pub(crate) fn run_tui_line_mode(session: &mut Session) -> Result<i32, SchemaUiError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(session, &mut reader, &mut writer)
}

pub(crate) fn run_tui_line_mode_with_io(
    session: &mut Session,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, SchemaUiError> {
    writeln!(writer, "Schema UI").map_err(map_tui_io)?;
    writeln!(writer, "{}", HELP_TEXT).map_err(map_tui_io)?;
    write_view(session, writer)?;

    loop {
        let Some(raw) = prompt_input_from("> ", reader, writer)? else {
            return Ok(0);
        };
        let mut lines = Vec::new();
        let outcome = handle_line_cmd(raw.trim(), session, &mut |line| lines.push(line));
        for line in lines {
            writeln!(writer, "{}", line).map_err(map_tui_io)?;
        }
        match outcome {
            Ok(TuiCommandAction::Quit) => return Ok(0),
            Ok(TuiCommandAction::Refresh) => write_view(session, writer)?,
            Ok(TuiCommandAction::Continue) => {}
            Ok(TuiCommandAction::NotHandled) => {
                writeln!(writer, "unknown command: {} (try :help)", raw.trim())
                    .map_err(map_tui_io)?;
            }
            Err(error) => {
                writeln!(writer, "error [{}]: {}", error.code, error.message)
                    .map_err(map_tui_io)?;
            }
        }
    }
}

fn write_view(session: &Session, writer: &mut dyn Write) -> Result<(), SchemaUiError> {
    let Some(root) = session.rendered() else {
        writeln!(writer, "(no app; try :prompt Create a calculator)").map_err(map_tui_io)?;
        return Ok(());
    };
    writeln!(writer).map_err(map_tui_io)?;
    let options = LayoutOptions {
        focus: None,
        show_indices: true,
    };
    for line in layout_tree(root, options) {
        writeln!(writer, "{}", line_text(&line).trim_end()).map_err(map_tui_io)?;
    }
    Ok(())
}

fn parse_index(raw: &str) -> Result<usize, SchemaUiError> {
    raw.trim_start_matches('#').parse::<usize>().map_err(|_| {
        SchemaUiError::new(
            "TUI_TARGET_PARSE",
            format!("Invalid control index: {}", raw),
        )
    })
}

pub(crate) fn handle_line_cmd(
    raw: &str,
    session: &mut Session,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, SchemaUiError> {
    let (command, argument) = match raw.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (raw, ""),
    };
    match command {
        "" => Ok(TuiCommandAction::Continue),
        ":help" => {
            emit(HELP_TEXT.to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":examples" => {
            for (label, prompt) in EXAMPLE_PROMPTS {
                emit(format!("{}: :prompt {}", label, prompt));
            }
            Ok(TuiCommandAction::Continue)
        }
        ":prompt" => {
            match session.submit_prompt(argument)? {
                Some(app) => emit(format!("opened {}", app)),
                None => emit("no app matches that prompt".to_string()),
            }
            Ok(TuiCommandAction::Refresh)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(TuiCommandAction::Quit)
        }
        "click" => {
            session.click(parse_index(argument)?)?;
            Ok(TuiCommandAction::Refresh)
        }
        "press" => {
            session.click_label(argument)?;
            Ok(TuiCommandAction::Refresh)
        }
        "type" => {
            let (index, text) = argument.split_once(char::is_whitespace).unwrap_or((argument, ""));
            session.change(parse_index(index)?, text)?;
            Ok(TuiCommandAction::Refresh)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

/// Reads one line without its terminator. `None` means end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, SchemaUiError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_tui_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
