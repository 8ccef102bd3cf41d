use super::*;

use std::io::Cursor;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use su_api::{AppKind, Session};
use su_core::SchemaUiError;

use crate::agent::{parse_step, run_agent_to, AgentStep};
use crate::line_tui::{handle_line_cmd, run_tui_line_mode_with_io};
use crate::tui_actions::handle_key;
use crate::tui_state::{TuiUiState, CREATE_DELAY};

fn agent_output(prompt: &str, steps: &[&str]) -> Result<String, SchemaUiError> {
    let mut out = Vec::new();
    let code = run_agent_to(
        AgentArgs {
            prompt: prompt.to_string(),
            steps: steps.iter().map(|step| step.to_string()).collect(),
        },
        &mut out,
    )?;
    assert_eq!(code, 0);
    Ok(String::from_utf8(out).expect("utf8"))
}

fn line_session(script: &str) -> String {
    let mut session = Session::new();
    let mut reader = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();
    let code = run_tui_line_mode_with_io(&mut session, &mut reader, &mut out)
        .expect("line mode should run");
    assert_eq!(code, 0);
    String::from_utf8(out).expect("utf8")
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn display(session: &Session) -> String {
    session.texts()[1].clone()
}

#[test]
fn parse_step_accepts_click_and_type() {
    assert_eq!(
        parse_step("click:+").expect("click"),
        AgentStep::Click("+".to_string())
    );
    assert_eq!(
        parse_step("click:a:b").expect("click with colon"),
        AgentStep::Click("a:b".to_string())
    );
    assert_eq!(
        parse_step("type:0:Buy milk: 2L").expect("type"),
        AgentStep::Type {
            index: 0,
            text: "Buy milk: 2L".to_string()
        }
    );
    assert_eq!(
        parse_step("type:0:").expect("empty text"),
        AgentStep::Type {
            index: 0,
            text: String::new()
        }
    );
}

#[test]
fn parse_step_rejects_malformed_steps() {
    for raw in ["click", "click:", "type:x:hi", "type:1", "hover:button"] {
        let error = parse_step(raw).expect_err("malformed step");
        assert_eq!(error.code, "CLI_STEP_PARSE", "step {}", raw);
    }
}

#[test]
fn agent_runs_calculator_steps() {
    let output = agent_output(
        "Create a calculator",
        &["click:7", "click:+", "click:3", "click:="],
    )
    .expect("agent should succeed");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "RESULT:OK");
    assert_eq!(lines[1], "APP:calculator");
    assert_eq!(lines[2], "TEXT:\"Calculator\"");
    assert_eq!(lines[3], "TEXT:\"10\"");
    assert!(lines.contains(&"CONTROL:0:Button:\"C\""));
    assert!(lines.contains(&"CONTROL:16:Button:\".\""));
}

#[test]
fn agent_runs_todo_steps() {
    let output = agent_output(
        "make me a todo list",
        &["type:0:Buy milk", "click:Add Task"],
    )
    .expect("agent should succeed");
    assert!(output.contains("APP:todo\n"));
    assert!(output.contains("TEXT:\"Buy milk\"\n"));
    assert!(output.contains("TEXT:\"task\"\n"));
    assert!(output.contains("CONTROL:0:Input:\"\"\n"));
    assert!(output.contains("CONTROL:2:Button:\"Complete\"\n"));
    assert!(output.contains("CONTROL:3:Button:\"Delete\"\n"));
}

#[test]
fn agent_reports_unknown_app_and_bad_targets() {
    let unknown = agent_output("weather widget", &[]).expect_err("no app");
    assert_eq!(unknown.code, "API_APP_UNKNOWN");

    let missing = agent_output("calculator", &["click:%"]).expect_err("no such button");
    assert_eq!(missing.code, "API_TARGET_NOT_FOUND");

    let bad_step = agent_output("calculator", &["click:7", "jump:1"]).expect_err("bad step");
    assert_eq!(bad_step.code, "CLI_STEP_PARSE");
}

#[test]
fn line_mode_drives_calculator() {
    let output = line_session(":prompt Create a calculator\nclick 4\npress +\nclick #14\npress =\n:quit\n");
    assert!(output.contains("opened calculator"));
    assert!(output.contains("#4[ 7 ]"));
    assert!(output.lines().any(|line| line.trim() == "10"));
    assert!(output.ends_with("bye\n"));
}

#[test]
fn line_mode_reports_errors_and_stops_at_eof() {
    let output = line_session("click 0\n:prompt todo\nclick 0\nfrobnicate\ntype 0 hi there\n");
    assert!(output.contains("(no app; try :prompt Create a calculator)"));
    assert!(output.contains("error [API_TARGET_NOT_FOUND]"));
    assert!(output.contains("error [API_TARGET_KIND]"));
    assert!(output.contains("unknown command: frobnicate"));
    assert!(output.contains("[hi there"));
}

#[test]
fn line_commands_emit_help_and_examples() {
    let mut session = Session::new();
    let mut lines = Vec::new();
    let action = handle_line_cmd(":examples", &mut session, &mut |line| lines.push(line))
        .expect("examples");
    assert_eq!(action, TuiCommandAction::Continue);
    assert_eq!(
        lines,
        vec![
            "🧮 Calculator: :prompt Create a calculator".to_string(),
            "📝 Todo List: :prompt Create a todo list".to_string(),
        ]
    );

    let action = handle_line_cmd(":prompt nothing", &mut session, &mut |_| {}).expect("prompt");
    assert_eq!(action, TuiCommandAction::Refresh);
    assert!(session.app().is_none());

    let error = handle_line_cmd("click x", &mut session, &mut |_| {}).expect_err("bad index");
    assert_eq!(error.code, "TUI_TARGET_PARSE");
}

#[test]
fn tui_example_shortcut_creates_app_after_delay() {
    let mut session = Session::new();
    let mut ui = TuiUiState::new();
    let start = Instant::now();

    assert!(!handle_key(key(KeyCode::F(2)), &mut session, &mut ui, start).expect("key"));
    assert!(ui.is_creating());
    assert!(!ui.tick(start, &mut session).expect("early tick"));
    assert!(session.app().is_none());

    assert!(ui.tick(start + CREATE_DELAY, &mut session).expect("tick"));
    assert_eq!(session.app(), Some(AppKind::Calculator));
    assert!(!ui.editing_prompt);
    assert!(!ui.is_creating());
}

#[test]
fn tui_keys_move_focus_and_click() {
    let mut session = Session::new();
    session.open(AppKind::Calculator).expect("open");
    let mut ui = TuiUiState::new();
    ui.editing_prompt = false;
    let now = Instant::now();

    for _ in 0..4 {
        handle_key(key(KeyCode::Tab), &mut session, &mut ui, now).expect("tab");
    }
    assert_eq!(ui.focus, 4);
    handle_key(key(KeyCode::Enter), &mut session, &mut ui, now).expect("enter");
    assert_eq!(display(&session), "7");

    handle_key(key(KeyCode::BackTab), &mut session, &mut ui, now).expect("backtab");
    assert_eq!(ui.focus, 3);
    ui.focus = 0;
    handle_key(key(KeyCode::Up), &mut session, &mut ui, now).expect("wrap");
    assert_eq!(ui.focus, 16);

    assert!(handle_key(key(KeyCode::Esc), &mut session, &mut ui, now).expect("esc"));
    assert!(handle_key(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        &mut session,
        &mut ui,
        now
    )
    .expect("ctrl-c"));
}

#[test]
fn tui_typing_edits_focused_input_and_prompt() {
    let mut session = Session::new();
    let mut ui = TuiUiState::new();
    let now = Instant::now();

    for ch in "todo".chars() {
        handle_key(key(KeyCode::Char(ch)), &mut session, &mut ui, now).expect("type");
    }
    handle_key(key(KeyCode::Backspace), &mut session, &mut ui, now).expect("backspace");
    assert_eq!(ui.prompt_buffer, "tod");
    handle_key(key(KeyCode::Char('o')), &mut session, &mut ui, now).expect("type");
    handle_key(key(KeyCode::Enter), &mut session, &mut ui, now).expect("submit");
    ui.tick(now + CREATE_DELAY, &mut session).expect("tick");
    assert_eq!(session.app(), Some(AppKind::Todo));

    for ch in "hi".chars() {
        handle_key(key(KeyCode::Char(ch)), &mut session, &mut ui, now).expect("type");
    }
    handle_key(key(KeyCode::Backspace), &mut session, &mut ui, now).expect("backspace");
    assert_eq!(
        session.interactive()[0].prop("value"),
        Some(&su_core::SuValue::from("h"))
    );

    handle_key(key(KeyCode::Tab), &mut session, &mut ui, now).expect("tab");
    handle_key(key(KeyCode::Enter), &mut session, &mut ui, now).expect("add");
    assert!(session.texts().contains(&"h".to_string()));
    assert_eq!(session.interactive().len(), 4);
}

#[test]
fn tui_blank_prompt_is_not_queued() {
    let mut session = Session::new();
    let mut ui = TuiUiState::new();
    handle_key(key(KeyCode::Enter), &mut session, &mut ui, Instant::now()).expect("enter");
    assert!(!ui.is_creating());
    assert_eq!(ui.status, "type a prompt first");
}

#[test]
fn tui_log_target_follows_mode() {
    let args = |line: bool, log_file: Option<&str>| TuiArgs {
        prompt: None,
        line,
        log_file: log_file.map(str::to_string),
    };
    assert_eq!(tui_log_target(&args(false, None)), LogTarget::Discard);
    assert_eq!(tui_log_target(&args(true, None)), LogTarget::Stderr);
    assert_eq!(
        tui_log_target(&args(false, Some("ui.log"))),
        LogTarget::File("ui.log".to_string())
    );
}

#[test]
fn run_cli_rejects_unknown_subcommand() {
    assert_ne!(run_cli_from_args(["su-cli", "serve"]), 0);
}
