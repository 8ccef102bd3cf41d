use su_core::{number_to_text, SuValue, ValueMap};
use su_runtime::{Context, BUTTON_LABEL_KEY};
use tracing::{debug, warn};

use super::arith::eval_arith;

pub const ERROR_DISPLAY: &str = "Error";
const DISPLAY_KEY: &str = "display";

const SYMBOL_MAP: [(char, char); 3] = [('÷', '/'), ('×', '*'), ('−', '-')];

fn is_operator(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '÷' | '×' | '−')
}

/// Handles `number`, `operator`, `equals` and `clear` against the
/// `display` field of the enclosing State scope.
pub fn handle_action(action: &str, context: &Context) {
    let Some(setter) = context.state_setter() else {
        warn!(action, "calculator action has no setState in context; dropping");
        return;
    };

    let display = context
        .get(DISPLAY_KEY)
        .filter(|value| !value.is_null())
        .map(SuValue::to_text)
        .unwrap_or_else(|| "0".to_string());
    let label = context
        .get(BUTTON_LABEL_KEY)
        .filter(|value| !value.is_null())
        .map(SuValue::to_text)
        .unwrap_or_default();

    let next = match action {
        "number" => press_number(&display, &label),
        "operator" => press_operator(&display, &label),
        "equals" => evaluate_display(&display),
        "clear" => "0".to_string(),
        other => {
            warn!(action = other, "unknown calculator action");
            return;
        }
    };
    let from = display.as_str();
    debug!(action, from, to = %next, "calculator display updated");

    let mut patch = ValueMap::new();
    patch.insert(DISPLAY_KEY.to_string(), SuValue::String(next));
    setter.set_state(patch);
}

pub fn press_number(display: &str, label: &str) -> String {
    if display == "0" || display == ERROR_DISPLAY {
        label.to_string()
    } else {
        format!("{}{}", display.trim_end(), label)
    }
}

pub fn press_operator(display: &str, label: &str) -> String {
    if display == "0" || display == ERROR_DISPLAY {
        return display.to_string();
    }
    let mut next = display.trim_end().to_string();
    if next.chars().last().is_some_and(is_operator) {
        next.pop();
        next.truncate(next.trim_end().len());
    }
    if next.chars().last().is_some_and(is_operator) {
        next.pop();
        next.truncate(next.trim_end().len());
    }
    format!("{next} {label} ")
}

/// Evaluates the display text. Empty input shows `0`; anything that does not
/// parse or is not finite shows [`ERROR_DISPLAY`].
pub fn evaluate_display(display: &str) -> String {
    let mapped: String = display
        .trim()
        .chars()
        .map(|ch| {
            SYMBOL_MAP
                .iter()
                .find(|(symbol, _)| *symbol == ch)
                .map_or(ch, |(_, operator)| *operator)
        })
        .collect();
    let sanitized: String = mapped
        .chars()
        .filter(|ch| ch.is_ascii_digit() || "+-*/().".contains(*ch) || ch.is_whitespace())
        .collect();
    if sanitized.trim().is_empty() {
        return "0".to_string();
    }

    match eval_arith(&sanitized) {
        Ok(result) if result.is_finite() => format_result(result),
        Ok(_) => ERROR_DISPLAY.to_string(),
        Err(error) => {
            debug!(%error, expression = %sanitized, "calculation failed");
            ERROR_DISPLAY.to_string()
        }
    }
}

fn format_result(result: f64) -> String {
    if result.fract() == 0.0 {
        return number_to_text(result);
    }
    number_to_text((result * 1e10).round() / 1e10)
}
