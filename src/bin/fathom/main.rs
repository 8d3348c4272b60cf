//! Fathom CLI - toolchain and library discovery for numerical software

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("fathom=debug")
    } else {
        EnvFilter::new("fathom=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Configure(args) => {
            commands::configure::execute(args, cli.verbose, cli.quiet, cli.color)
        }
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
