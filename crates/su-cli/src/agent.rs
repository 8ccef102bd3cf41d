use std::io::Write;

use su_api::Session;
use su_core::SchemaUiError;
use su_runtime::Primitive;
use tracing::debug;

use crate::{map_cli_output, AgentArgs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AgentStep {
    Click(String),
    Type { index: usize, text: String },
}

fn step_parse_error(raw: &str, detail: &str) -> SchemaUiError {
    SchemaUiError::new(
        "CLI_STEP_PARSE",
        format!("Invalid step \"{}\": {}.", raw, detail),
    )
}

/// Parses `click:LABEL` or `type:INDEX:TEXT`. The label and text keep any
/// further colons verbatim.
pub(crate) fn parse_step(raw: &str) -> Result<AgentStep, SchemaUiError> {
    let Some((verb, rest)) = raw.split_once(':') else {
        return Err(step_parse_error(raw, "expected VERB:ARGS"));
    };
    match verb {
        "click" if !rest.is_empty() => Ok(AgentStep::Click(rest.to_string())),
        "click" => Err(step_parse_error(raw, "click needs a button label")),
        "type" => {
            let (index, text) = rest
                .split_once(':')
                .ok_or_else(|| step_parse_error(raw, "expected type:INDEX:TEXT"))?;
            let index = index
                .parse::<usize>()
                .map_err(|_| step_parse_error(raw, "input index must be a number"))?;
            Ok(AgentStep::Type {
                index,
                text: text.to_string(),
            })
        }
        other => Err(step_parse_error(raw, &format!("unknown verb {}", other))),
    }
}

pub(crate) fn apply_step(session: &mut Session, step: &AgentStep) -> Result<(), SchemaUiError> {
    debug!(?step, "applying step");
    match step {
        AgentStep::Click(label) => session.click_label(label)?,
        AgentStep::Type { index, text } => session.change(*index, text)?,
    };
    Ok(())
}

pub(crate) fn run_agent(args: AgentArgs) -> Result<i32, SchemaUiError> {
    run_agent_to(args, &mut std::io::stdout())
}

/// Steps are parsed up front so a typo fails before anything is clicked.
pub(crate) fn run_agent_to(args: AgentArgs, writer: &mut dyn Write) -> Result<i32, SchemaUiError> {
    let steps = args
        .steps
        .iter()
        .map(|raw| parse_step(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = Session::new();
    let app = session.submit_prompt(&args.prompt)?.ok_or_else(|| {
        SchemaUiError::new(
            "API_APP_UNKNOWN",
            format!("No app matches prompt \"{}\".", args.prompt),
        )
    })?;
    for step in &steps {
        apply_step(&mut session, step)?;
    }

    emit_snapshot(&session, app.name(), writer).map_err(map_cli_output)?;
    Ok(0)
}

pub(crate) fn emit_snapshot(
    session: &Session,
    app_name: &str,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(writer, "RESULT:OK")?;
    writeln!(writer, "APP:{}", app_name)?;
    for text in session.texts() {
        writeln!(writer, "TEXT:{}", json_string(&text))?;
    }
    for (index, node) in session.interactive().into_iter().enumerate() {
        let shown = match node.primitive {
            Primitive::Input => node
                .prop("value")
                .map(|value| value.to_text())
                .unwrap_or_default(),
            _ => node.label().unwrap_or_default(),
        };
        writeln!(
            writer,
            "CONTROL:{}:{}:{}",
            index,
            node.primitive.as_str(),
            json_string(&shown)
        )?;
    }
    Ok(())
}

fn json_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}
