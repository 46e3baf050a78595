use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, info};

use dfs_client::client::{DEFAULT_API_URL, OPTIMIZE_FAILED_MESSAGE, OptimizerClient};
use dfs_client::render::{render_lineup, render_tabs};
use dfs_client::session::{Session, run_interactive};
use dfs_common::api::{MAX_WEEK, OptimizeRequest};
use dfs_common::logging::init_cli_tracing;
use dfs_common::selection::PlayerSelection;

#[derive(Debug, Parser)]
#[command(name = "dfs-client", about = "Build DraftKings lineups from the optimizer API")]
struct Cli {
    /// Base URL of the optimizer API
    #[arg(long, global = true, env = "DFS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "DFS_CLIENT_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request lineups once and print them
    Optimize(OptimizeArgs),
    /// Edit the form and player lists at a prompt (default)
    Interactive,
}

#[derive(Debug, Args)]
struct OptimizeArgs {
    /// Week of the slate; the latest slate when omitted
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_WEEK as i64))]
    week: Option<u32>,

    /// Defense to lock in, e.g. "ravens"
    #[arg(long)]
    dst: Option<String>,

    /// Play exactly one tight end
    #[arg(long)]
    one_te: bool,

    /// Player to leave out (repeatable)
    #[arg(long = "exclude", value_name = "PLAYER")]
    excluded: Vec<String>,

    /// Player to lock in (repeatable)
    #[arg(long = "include", value_name = "PLAYER")]
    included: Vec<String>,

    /// Print the raw JSON response
    #[arg(long)]
    json: bool,
}

/// Trimmed names in first-seen order, blanks and repeats dropped.
fn unique_names(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    out
}

impl OptimizeArgs {
    fn request(&self) -> Result<OptimizeRequest> {
        let excluded_players = unique_names(&self.excluded);
        let included_players = unique_names(&self.included);
        if let Some(name) = excluded_players
            .iter()
            .find(|name| included_players.contains(name))
        {
            bail!("'{name}' was passed to both --exclude and --include");
        }

        Ok(OptimizeRequest {
            excluded_players,
            included_players,
            ..OptimizeRequest::from_form(
                self.week,
                self.dst.as_deref(),
                self.one_te,
                &PlayerSelection::new(),
            )
        })
    }
}

/// Send one request and print the lineups to `out`.
///
/// A failed request is logged and only the generic message goes to `err_out`; the return
/// value tells the caller whether to exit non-zero.
async fn optimize_once<W: Write, E: Write>(
    client: &OptimizerClient,
    request: &OptimizeRequest,
    json: bool,
    out: &mut W,
    err_out: &mut E,
) -> Result<bool> {
    let lineups = match client.optimize(request).await {
        Ok(lineups) => lineups,
        Err(err) => {
            error!(error = %err, api_url = client.base_url(), "optimize request failed");
            writeln!(err_out, "{OPTIMIZE_FAILED_MESSAGE}")?;
            return Ok(false);
        }
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &lineups)?;
        writeln!(out)?;
        return Ok(true);
    }

    let selection = PlayerSelection::new();
    for (index, lineup) in lineups.iter().enumerate() {
        writeln!(out, "{}", render_tabs(lineups.len(), index))?;
        writeln!(out)?;
        writeln!(out, "{}", render_lineup(lineup, &selection))?;
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_cli_tracing("dfs-client");

    let cli = Cli::parse();
    let client = OptimizerClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))
        .context("failed to build HTTP client")?;
    info!(
        api_url = client.base_url(),
        process_run_id = dfs_common::run_id::process(),
        "dfs-client started"
    );

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Optimize(args) => {
            let request = args.request()?;
            let mut stdout = io::stdout();
            let mut stderr = io::stderr();
            let succeeded =
                optimize_once(&client, &request, args.json, &mut stdout, &mut stderr).await?;
            stdout.flush()?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Interactive => {
            let stdin = io::stdin().lock();
            let mut stdout = io::stdout();
            let mut session = Session::new();
            run_interactive(&client, &mut session, stdin, &mut stdout).await?;
            Ok(())
        }
    }
}
