use anyhow::Context;
use clap::Parser;
use listing_watch::agent::{shutdown_on_signal, Agent};
use listing_watch::logging::{self, DEFAULT_LOG_FILE};
use listing_watch::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Watches a rental search page and reports newly listed apartments
#[derive(Parser, Debug)]
#[command(name = "listing-watch", version, long_about = None)]
struct Cli {
    /// Run a single check and exit
    #[arg(long, conflicts_with = "test")]
    once: bool,

    /// Test scraping and every notification channel, then exit
    #[arg(long)]
    test: bool,

    /// Check interval in minutes (overrides CHECK_INTERVAL_MINUTES)
    #[arg(long, value_name = "MINUTES")]
    interval: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also append log output to this file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log to the console only
    #[arg(long, conflicts_with = "log_file")]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let log_file = (!cli.no_log_file).then_some(cli.log_file.as_path());
    logging::init(cli.verbose, cli.quiet, log_file)?;

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(minutes) = cli.interval {
        config = config.with_interval(minutes)?;
        info!("Using custom interval: {} minutes", minutes);
    }

    info!("🏠 Listing watch for {}", config.target.url);
    let agent = Agent::from_config(&config)?;

    if cli.test {
        let passed = agent.self_test().await;
        return Ok(if passed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if cli.once {
        agent.run_once().await;
    } else {
        let shutdown = shutdown_on_signal().context("Unable to install signal handlers")?;
        agent.run_continuous(shutdown).await;
    }

    Ok(ExitCode::SUCCESS)
}
