use std::path::Path;

use su_api::Session;

use crate::source::read_case;
use crate::{ScenarioAction, ScenarioCase, SuToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub app: Option<String>,
    pub texts: Vec<String>,
    pub applied_actions: usize,
}

pub fn run_case(case: &ScenarioCase) -> Result<RunReport, SuToolError> {
    let mut session = Session::new();
    let app = session.submit_prompt(&case.prompt)?;

    for (action_index, action) in case.actions.iter().enumerate() {
        let outcome = match action {
            ScenarioAction::Click { label } => session.click_label(label),
            ScenarioAction::Press { index } => session.click(*index),
            ScenarioAction::Type { index, text } => session.change(*index, text),
        };
        outcome.map_err(|source| SuToolError::ActionFailed {
            action_index,
            kind: action.kind_name().to_string(),
            source,
        })?;
    }

    Ok(RunReport {
        app: app.map(|app| app.name().to_string()),
        texts: session.texts(),
        applied_actions: case.actions.len(),
    })
}

/// Runs the case and checks the report against its expectation.
pub fn check_case(case: &ScenarioCase) -> Result<RunReport, SuToolError> {
    let report = run_case(case)?;
    let expected = &case.expected;

    if report.app != expected.app {
        return Err(SuToolError::AppMismatch {
            expected: format!("{:?}", expected.app),
            actual: format!("{:?}", report.app),
        });
    }

    if let Some(texts) = &expected.texts {
        if texts != &report.texts {
            return Err(SuToolError::TextsMismatch {
                expected: serde_json::to_string(texts).map_err(SuToolError::Serialize)?,
                actual: serde_json::to_string(&report.texts).map_err(SuToolError::Serialize)?,
            });
        }
    }

    for text in &expected.contains {
        if !report.texts.contains(text) {
            return Err(SuToolError::MissingText {
                text: text.clone(),
                observed: serde_json::to_string(&report.texts).map_err(SuToolError::Serialize)?,
            });
        }
    }

    for text in &expected.absent {
        if report.texts.contains(text) {
            return Err(SuToolError::UnexpectedText { text: text.clone() });
        }
    }

    Ok(report)
}

pub fn assert_case(case_path: &Path) -> Result<(), SuToolError> {
    let case = read_case(case_path)?;
    check_case(&case)?;
    Ok(())
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    use crate::{Expectation, SCENARIO_SCHEMA_V1};

    fn case(prompt: &str, actions: Vec<ScenarioAction>, expected: Expectation) -> ScenarioCase {
        ScenarioCase {
            schema_version: SCENARIO_SCHEMA_V1.to_string(),
            prompt: prompt.to_string(),
            actions,
            expected,
        }
    }

    fn click(label: &str) -> ScenarioAction {
        ScenarioAction::Click {
            label: label.to_string(),
        }
    }

    #[test]
    fn run_case_applies_actions_in_order() {
        let report = run_case(&case(
            "calculator",
            vec![click("1"), click("2"), ScenarioAction::Press { index: 0 }],
            Expectation::default(),
        ))
        .expect("run should pass");

        assert_eq!(report.app.as_deref(), Some("calculator"));
        assert_eq!(report.applied_actions, 3);
        assert_eq!(report.texts[1], "0");
    }

    #[test]
    fn check_case_accepts_matching_expectation() {
        let report = check_case(&case(
            "todo",
            vec![
                ScenarioAction::Type {
                    index: 0,
                    text: "Read".to_string(),
                },
                click("Add Task"),
            ],
            Expectation {
                app: Some("todo".to_string()),
                texts: None,
                contains: vec!["Read".to_string(), "Complete".to_string()],
                absent: vec!["Undo".to_string()],
            },
        ))
        .expect("expectation should hold");
        assert_eq!(report.applied_actions, 2);
    }

    #[test]
    fn check_case_reports_each_mismatch_kind() {
        let wrong_app = check_case(&case("todo", vec![], Expectation::default()))
            .expect_err("no app expected");
        assert!(matches!(wrong_app, SuToolError::AppMismatch { .. }));

        let calculator = |expected: Expectation| case("calculator", vec![], expected);
        let app = Some("calculator".to_string());

        let texts = check_case(&calculator(Expectation {
            app: app.clone(),
            texts: Some(vec!["Calculator".to_string()]),
            ..Expectation::default()
        }))
        .expect_err("texts differ");
        assert!(matches!(texts, SuToolError::TextsMismatch { .. }));

        let missing = check_case(&calculator(Expectation {
            app: app.clone(),
            contains: vec!["42".to_string()],
            ..Expectation::default()
        }))
        .expect_err("text missing");
        assert!(matches!(missing, SuToolError::MissingText { .. }));

        let unexpected = check_case(&calculator(Expectation {
            app,
            absent: vec!["C".to_string()],
            ..Expectation::default()
        }))
        .expect_err("text present");
        assert!(matches!(unexpected, SuToolError::UnexpectedText { .. }));
    }

    #[test]
    fn run_case_reports_failing_action_index() {
        let error = run_case(&case(
            "calculator",
            vec![click("7"), click("%")],
            Expectation::default(),
        ))
        .expect_err("missing button");
        match error {
            SuToolError::ActionFailed {
                action_index,
                kind,
                source,
            } => {
                assert_eq!(action_index, 1);
                assert_eq!(kind, "click");
                assert_eq!(source.code, "API_TARGET_NOT_FOUND");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
