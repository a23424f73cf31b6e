//! Command-line client for operating a rescan deployment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;
use rescan_config::config_path_from_env;
use uuid::Uuid;

use crate::client::{CliError, CliResult, build_client};
use crate::commands::check::handle_check;
use crate::commands::ping::handle_ping;
use crate::commands::preview::handle_preview;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3030";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

pub(crate) async fn dispatch(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Check(args) => handle_check(&args, cli.output),
        Command::Preview(args) => handle_preview(&args, cli.output),
        Command::Ping(args) => {
            let request_id = Uuid::new_v4().to_string();
            let client = build_client(cli.timeout, &request_id)?;
            handle_ping(&client, &args, &request_id).await
        }
    }
}

#[derive(Parser)]
#[command(name = "rescanctl", about = "Operator CLI for the rescan trigger service")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "RESCAN_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load and validate a configuration file, then list its triggers.
    Check(CheckArgs),
    /// Show the folder a `Transcoded` notification would scan.
    Preview(PreviewArgs),
    /// Send a `Test` notification to a running server.
    Ping(PingArgs),
}

#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Configuration file; defaults to `RESCAN_CONFIG`, then `config.yml`.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct PreviewArgs {
    #[arg(long)]
    pub(crate) trigger: String,
    /// Directory reported in `meta.Directory`.
    #[arg(long)]
    pub(crate) directory: String,
    /// File reported in `file`.
    #[arg(long)]
    pub(crate) file: String,
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct PingArgs {
    #[arg(
        long,
        env = "RESCAN_SERVER_URL",
        value_parser = parse_url,
        default_value = DEFAULT_SERVER_URL
    )]
    pub(crate) url: Url,
    #[arg(long)]
    pub(crate) trigger: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

/// Explicit path, else `RESCAN_CONFIG`, else `config.yml`.
pub(crate) fn resolve_config(explicit: Option<&PathBuf>) -> PathBuf {
    explicit.cloned().unwrap_or_else(config_path_from_env)
}

pub(crate) fn require_route_segment(name: &str) -> CliResult<()> {
    if !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "trigger name '{name}' must match [A-Za-z0-9_-]+"
        )))
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}
