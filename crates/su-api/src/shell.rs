use crate::apps::AppKind;

/// Shortcut prompts offered by the shell: display label and prompt text.
pub const EXAMPLE_PROMPTS: [(&str, &str); 2] = [
    ("🧮 Calculator", "Create a calculator"),
    ("📝 Todo List", "Create a todo list"),
];

/// Picks the app a free-text prompt asks for. "calculator" is checked
/// before "todo"; anything else selects nothing.
pub fn select_app(prompt: &str) -> Option<AppKind> {
    let normalized = prompt.trim().to_lowercase();
    if normalized.contains("calculator") {
        Some(AppKind::Calculator)
    } else if normalized.contains("todo") {
        Some(AppKind::Todo)
    } else {
        None
    }
}
