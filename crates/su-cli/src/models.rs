#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    Continue,
    Refresh,
    Quit,
    NotHandled,
}

/// Where diagnostics go. The full-screen UI must not share the terminal
/// with log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogTarget {
    Stderr,
    File(String),
    Discard,
}
