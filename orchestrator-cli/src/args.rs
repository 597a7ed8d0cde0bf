use clap::Parser;

/// Demo CLI for the request orchestration core.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Run a single turn with this message instead of reading stdin.
    pub message: Option<String>,

    /// `log` filter string, e.g. "info" or "router=debug,search=debug".
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}
