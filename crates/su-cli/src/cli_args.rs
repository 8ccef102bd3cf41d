use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "su-cli")]
#[command(about = "Schema UI interpreter: calculator and todo demos in the terminal")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Run a prompt and scripted steps headlessly, printing machine-readable lines.
    Agent(AgentArgs),
    /// Interactive terminal UI.
    Tui(TuiArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[arg(long = "prompt")]
    pub(crate) prompt: String,
    /// `click:LABEL` or `type:INDEX:TEXT`; applied in order.
    #[arg(long = "step")]
    pub(crate) steps: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[arg(long = "prompt")]
    pub(crate) prompt: Option<String>,
    /// Plain stdin/stdout mode instead of the full-screen UI.
    #[arg(long = "line")]
    pub(crate) line: bool,
    #[arg(long = "log-file")]
    pub(crate) log_file: Option<String>,
}
