mod case;
mod runner;
mod source;

pub use case::{Expectation, ScenarioAction, ScenarioCase, SCENARIO_SCHEMA_V1};
pub use runner::{assert_case, check_case, run_case, RunReport};
pub use source::{discover_cases, read_case, SCENARIO_SUFFIX};

use std::path::PathBuf;

use su_core::SchemaUiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("Failed to parse scenario {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid scenario schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No *.case.json files under {path}.")]
    SourceEmpty { path: PathBuf },
    #[error("Session error: {0}")]
    Api(#[from] SchemaUiError),
    #[error("Action {action_index} ({kind}) failed: {source}")]
    ActionFailed {
        action_index: usize,
        kind: String,
        source: SchemaUiError,
    },
    #[error("Expected app {expected}, actual {actual}.")]
    AppMismatch { expected: String, actual: String },
    #[error("Texts mismatch. expected={expected} actual={actual}")]
    TextsMismatch { expected: String, actual: String },
    #[error("Missing text \"{text}\". observed={observed}")]
    MissingText { text: String, observed: String },
    #[error("Unexpected text \"{text}\".")]
    UnexpectedText { text: String },
    #[error("Failed to serialize texts for diff: {0}")]
    Serialize(serde_json::Error),
}
