use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod cli;
mod config;
mod core;
mod models;
mod utils;

use crate::cli::{Args, Command};
use crate::core::{render_fallback, Dashboard};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging() {
        eprintln!("{}", render_fallback(Some(&e.to_string())));
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        tracing::error!(
            event = "command_failed",
            message = "Unhandled error",
            error = %format!("{:#}", e)
        );
        eprint!("{}", render_fallback(Some(&format!("{:#}", e))));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration
    let config = config::Config::load(args.config.as_deref())?;

    let mut dashboard = Dashboard::new(config)?;
    match args.command() {
        Command::Show { history } => dashboard.show(history).await,
        Command::Connect => dashboard.connect().await,
        Command::Disconnect => dashboard.disconnect(),
        Command::Bet { tag, amount, yes } => dashboard.bet(tag, &amount, yes).await,
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
