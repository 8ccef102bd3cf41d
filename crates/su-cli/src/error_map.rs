use std::fmt::Display;
use std::io::Write;

use su_core::SchemaUiError;

fn map_error(code: &'static str, error: impl Display) -> SchemaUiError {
    SchemaUiError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: SchemaUiError) -> i32 {
    emit_error_to(&error, &mut std::io::stdout())
}

pub(crate) fn emit_error_to(error: &SchemaUiError, writer: &mut dyn Write) -> i32 {
    let message = serde_json::to_string(&error.message).unwrap_or_else(|_| "\"\"".to_string());
    let _ = writeln!(writer, "RESULT:ERROR");
    let _ = writeln!(writer, "ERROR_CODE:{}", error.code);
    let _ = writeln!(writer, "ERROR_MSG_JSON:{}", message);
    1
}

pub(crate) fn map_tui_io(error: std::io::Error) -> SchemaUiError {
    map_error("TUI_IO", error)
}

pub(crate) fn map_cli_output(error: std::io::Error) -> SchemaUiError {
    map_error("CLI_OUTPUT", error)
}

pub(crate) fn map_cli_log_file(error: std::io::Error) -> SchemaUiError {
    map_error("CLI_LOG_FILE", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_writes_protocol_and_returns_non_zero() {
        let mut out = Vec::new();
        let code = emit_error_to(
            &SchemaUiError::new("CLI_STEP_PARSE", "bad \"step\""),
            &mut out,
        );
        assert_eq!(code, 1);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "RESULT:ERROR\nERROR_CODE:CLI_STEP_PARSE\nERROR_MSG_JSON:\"bad \\\"step\\\"\"\n"
        );
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(map_tui_io(std::io::Error::other("io")).code, "TUI_IO");
        assert_eq!(map_cli_output(std::io::Error::other("out")).code, "CLI_OUTPUT");
        assert_eq!(
            map_cli_log_file(std::io::Error::other("log")).code,
            "CLI_LOG_FILE"
        );
    }
}
