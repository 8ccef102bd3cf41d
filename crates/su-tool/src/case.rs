use serde::{Deserialize, Serialize};

pub const SCENARIO_SCHEMA_V1: &str = "su-tool-case.v1";

/// One recorded session: a prompt, the interactions that follow it, and
/// what the screen must show afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCase {
    pub schema_version: String,
    pub prompt: String,
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
    #[serde(default)]
    pub expected: Expectation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScenarioAction {
    /// First button with this label.
    Click { label: String },
    /// Interactive node by document-order index.
    Press { index: usize },
    Type { index: usize, text: String },
}

impl ScenarioAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Press { .. } => "press",
            Self::Type { .. } => "type",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    /// `None` expects no app at all.
    #[serde(default)]
    pub app: Option<String>,
    /// Exact visible texts in document order, when given.
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub absent: Vec<String>,
}
