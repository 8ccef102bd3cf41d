use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{ScenarioCase, SuToolError, SCENARIO_SCHEMA_V1};

pub const SCENARIO_SUFFIX: &str = ".case.json";

/// Every `*.case.json` under `root`, sorted by path.
pub fn discover_cases(root: &Path) -> Result<Vec<PathBuf>, SuToolError> {
    let mut cases = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| SuToolError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .ends_with(SCENARIO_SUFFIX)
        {
            cases.push(entry.into_path());
        }
    }

    if cases.is_empty() {
        return Err(SuToolError::SourceEmpty {
            path: root.to_path_buf(),
        });
    }

    cases.sort();
    Ok(cases)
}

pub fn read_case(case_path: &Path) -> Result<ScenarioCase, SuToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| SuToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: ScenarioCase =
        serde_json::from_str(&raw).map_err(|source| SuToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != SCENARIO_SCHEMA_V1 {
        return Err(SuToolError::InvalidSchemaVersion {
            expected: SCENARIO_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
