use std::fs::OpenOptions;
use std::sync::Mutex;

use su_core::SchemaUiError;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{map_cli_log_file, LogTarget};

pub(crate) const LOG_FILTER_ENV: &str = "SU_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

pub(crate) fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber. A second call is a no-op, so tests that
/// drive several commands in one process are fine.
pub(crate) fn init_logging(target: &LogTarget) -> Result<(), SchemaUiError> {
    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .compact();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .event_format(format);

    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(map_cli_log_file)?;
            let _ = builder.with_writer(Mutex::new(file)).try_init();
        }
        LogTarget::Discard => {
            let _ = builder.with_writer(std::io::sink).try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod logging_tests {
    use super::*;

    #[test]
    fn unwritable_log_file_is_reported() {
        let missing_dir = std::env::temp_dir()
            .join("su-cli-no-such-dir")
            .join("nested")
            .join("log.txt");
        let error = init_logging(&LogTarget::File(missing_dir.to_string_lossy().to_string()))
            .expect_err("missing parent directory should fail");
        assert_eq!(error.code, "CLI_LOG_FILE");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(&LogTarget::Discard).expect("first init");
        init_logging(&LogTarget::Stderr).expect("second init");
    }
}
