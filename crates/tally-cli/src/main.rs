//! Tally CLI - reconcile noisy KPI claims into one trustworthy dataset.

use clap::Parser;
use tally_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> tally_cli::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Consolidate(args) => commands::execute_consolidate(args, &formatter)?,
        Command::Filter(args) => commands::execute_filter(args, &config, &formatter)?,
        Command::Verify(args) => commands::execute_verify(args, &config, &formatter).await?,
        Command::Review(args) => commands::execute_review(args, &config, &formatter).await?,
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
    }

    Ok(())
}
