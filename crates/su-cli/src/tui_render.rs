#![cfg(not(coverage))]

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;
use su_api::{Session, EXAMPLE_PROMPTS};
use su_runtime::primitives::Rgb;

use crate::layout::{layout_tree, LayoutOptions, SpanStyle, ViewLine};
use crate::tui_state::TuiUiState;

const ELLIPSIS: &str = "…";
const CHROME_ROWS: usize = 7;

pub(crate) fn render_tui(frame: &mut Frame<'_>, ui: &TuiUiState, session: &Session) {
    let terminal_width = frame.area().width as usize;
    let terminal_rows = frame.area().height as usize;
    let content_width = (terminal_width.saturating_sub(2)).max(16);

    let header_text = truncate_to_width("Schema UI | describe an app and press enter", content_width);
    let button_text = if ui.is_creating() {
        "[ Creating... ]"
    } else {
        "[ Create App ]"
    };
    let cursor = if ui.editing_prompt { "_" } else { "" };
    let prompt_text = truncate_to_width(
        format!("prompt: {}{}  {}", ui.prompt_buffer, cursor, button_text).as_str(),
        content_width,
    );
    let examples_text = truncate_to_width(
        EXAMPLE_PROMPTS
            .iter()
            .enumerate()
            .map(|(index, (label, _))| format!("F{} {}", index + 2, label))
            .collect::<Vec<_>>()
            .join("  ")
            .as_str(),
        content_width,
    );
    let divider_line = "─".repeat(content_width);
    let status_text = truncate_to_width(format!("status: {}", ui.status).as_str(), content_width);
    let key_text = truncate_to_width(
        "keys: ctrl-p prompt | tab/up/down focus | enter click/submit | type into inputs | F1 help | esc quit",
        content_width,
    );
    let help_text = truncate_to_width(
        "the prompt picks an app by keyword: \"calculator\" or \"todo\". state lives until another app opens.",
        content_width,
    );

    let app_rows = match session.rendered() {
        Some(root) => {
            let focus = (!ui.editing_prompt).then_some(ui.focus);
            layout_tree(
                root,
                LayoutOptions {
                    focus,
                    show_indices: false,
                },
            )
        }
        None => Vec::new(),
    };
    let mut reserved_rows = CHROME_ROWS;
    if ui.help_visible {
        reserved_rows += 1;
    }
    let visible_app_rows = terminal_rows.saturating_sub(reserved_rows).max(1);

    let mut lines_out: Vec<Line<'_>> = Vec::new();
    lines_out.push(Line::from(Span::styled(
        header_text,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let prompt_style = if ui.editing_prompt {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    lines_out.push(Line::from(Span::styled(prompt_text, prompt_style)));
    lines_out.push(Line::from(Span::styled(
        examples_text,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        divider_line,
        Style::default().fg(Color::Gray),
    )));
    if app_rows.is_empty() {
        lines_out.push(Line::from(Span::styled(
            "no app yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for row in app_rows.iter().take(visible_app_rows) {
        lines_out.push(view_line(row, content_width));
    }
    lines_out.push(Line::from(Span::styled(
        status_text,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        key_text,
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines_out.push(Line::from(Span::styled(
            help_text,
            Style::default().fg(Color::Magenta),
        )));
    }

    let paragraph = Paragraph::new(lines_out).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

fn view_line(row: &ViewLine, width: usize) -> Line<'static> {
    let mut remaining = width;
    let mut spans = Vec::new();
    for span in row {
        if remaining == 0 {
            break;
        }
        let text = truncate_to_width(&span.text, remaining);
        remaining = remaining.saturating_sub(text.chars().count());
        spans.push(Span::styled(text, span_style(&span.style)));
    }
    Line::from(spans)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn span_style(style: &SpanStyle) -> Style {
    let mut out = Style::default();
    if let Some(fg) = style.fg {
        out = out.fg(color(fg));
    }
    if let Some(bg) = style.bg {
        out = out.bg(color(bg));
    }
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.dim {
        out = out.add_modifier(Modifier::DIM);
    }
    if style.strike {
        out = out.add_modifier(Modifier::CROSSED_OUT);
    }
    if style.focused {
        out = out.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
    }
    out
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}
