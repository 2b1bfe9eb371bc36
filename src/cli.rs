use clap::Parser;

/// closings: is Delaware City Schools open, closed, or delayed?
#[derive(Parser, Debug, Clone)]
#[command(name = "closings", version, about)]
pub struct Cli {
    /// Response template to request (summary, evaluation)
    #[arg(long)]
    pub mode: Option<String>,

    /// Gemini model to query (default: gemini-2.5-flash)
    #[arg(long)]
    pub model: Option<String>,

    /// HTTP timeout for the status query, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory with instruction template overrides
    #[arg(long)]
    pub prompt_dir: Option<String>,

    /// Path to config file (default: closings.toml, if present)
    #[arg(long)]
    pub config: Option<String>,

    /// Print the result as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Keep running: Enter refreshes, `c` cancels, `q` quits
    #[arg(long, short, conflicts_with = "json")]
    pub interactive: bool,
}
