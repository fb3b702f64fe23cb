// ABOUTME: Entry point for the lamsync CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use lamsync::config;
use lamsync::error::Result;
use lamsync::output::{Output, OutputMode};
use lamsync::remote::ClientOptions;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);
    let result = run(cli, mode).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match cli.command {
        Commands::Init {
            function,
            role,
            force,
        } => {
            config::init_config(&cwd, function.as_deref(), role.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy {
            destination,
            region,
            profile,
        } => {
            let config = commands::load_config(&cwd, destination.as_deref())?;
            commands::deploy(config, ClientOptions::new(region, profile), output).await
        }
        Commands::Package {
            output: dest,
            destination,
        } => {
            let config = commands::load_config(&cwd, destination.as_deref())?;
            commands::package(config, dest, output).await
        }
        Commands::Status {
            destination,
            region,
            profile,
        } => {
            let config = commands::load_config(&cwd, destination.as_deref())?;
            commands::status(config, ClientOptions::new(region, profile), output).await
        }
    }
}
