use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use su_api::{Session, EXAMPLE_PROMPTS};
use su_core::SchemaUiError;
use su_runtime::Primitive;

use crate::tui_state::TuiUiState;

/// Applies one key press. Returns `Ok(true)` when the UI should exit.
pub(crate) fn handle_key(
    key: KeyEvent,
    session: &mut Session,
    ui: &mut TuiUiState,
    now: Instant,
) -> Result<bool, SchemaUiError> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc || (control && key.code == KeyCode::Char('c')) {
        return Ok(true);
    }

    match key.code {
        KeyCode::F(1) => {
            ui.help_visible = !ui.help_visible;
            return Ok(false);
        }
        KeyCode::F(number @ 2..=3) => {
            let (_, prompt) = EXAMPLE_PROMPTS[usize::from(number - 2)];
            ui.prompt_buffer = prompt.to_string();
            ui.queue_prompt(now);
            return Ok(false);
        }
        KeyCode::Char('p') if control => {
            ui.editing_prompt = !ui.editing_prompt || session.rendered().is_none();
            return Ok(false);
        }
        _ => {}
    }

    if ui.editing_prompt {
        edit_prompt(key, session, ui, now);
        return Ok(false);
    }

    let count = session.interactive().len();
    match key.code {
        KeyCode::Tab | KeyCode::Down => ui.focus_next(count),
        KeyCode::BackTab | KeyCode::Up => ui.focus_prev(count),
        KeyCode::Enter => {
            if ui.focused_kind(session) == Some(Primitive::Button) {
                session.click(ui.focus)?;
                ui.status = "clicked".to_string();
            }
        }
        KeyCode::Backspace => {
            if let Some(current) = focused_input_value(session, ui) {
                let mut next = current;
                next.pop();
                session.change(ui.focus, &next)?;
            }
        }
        KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
            if let Some(mut current) = focused_input_value(session, ui) {
                current.push(ch);
                session.change(ui.focus, &current)?;
            }
        }
        _ => {}
    }
    ui.clamp_focus(session.interactive().len());
    Ok(false)
}

fn edit_prompt(key: KeyEvent, session: &Session, ui: &mut TuiUiState, now: Instant) {
    match key.code {
        KeyCode::Enter => {
            if !ui.queue_prompt(now) && ui.prompt_buffer.trim().is_empty() {
                ui.status = "type a prompt first".to_string();
            }
        }
        KeyCode::Backspace => {
            ui.prompt_buffer.pop();
        }
        KeyCode::Tab | KeyCode::Down if session.rendered().is_some() => {
            ui.editing_prompt = false;
        }
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            ui.prompt_buffer.push(ch);
        }
        _ => {}
    }
}

fn focused_input_value(session: &Session, ui: &TuiUiState) -> Option<String> {
    let interactive = session.interactive();
    let node = interactive.get(ui.focus)?;
    (node.primitive == Primitive::Input).then(|| {
        node.prop("value")
            .map(|value| value.to_text())
            .unwrap_or_default()
    })
}
