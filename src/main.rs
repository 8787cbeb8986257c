// ABOUTME: Entry point for the shipctl CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use shipctl::error::Result;
use shipctl::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));

    match run(cli.command, output).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run a subcommand and return the process exit code.
async fn run(command: Commands, output: Output) -> Result<i32> {
    match command {
        Commands::Deploy(args) => commands::deploy(args, output).await.map(|()| 0),
        Commands::Rollback(args) => commands::rollback(args, output).await.map(|()| 0),
        Commands::Oneshot(args) => commands::oneshot(args, output).await,
        Commands::History(args) => commands::history(args, output).await.map(|()| 0),
    }
}
