// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lamsync")]
#[command(about = "Declarative deployment of a serverless function and its queue triggers")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new lamsync.yml configuration file
    Init {
        /// Function name to put in the template
        #[arg(long)]
        function: Option<String>,

        /// Execution role to put in the template
        #[arg(long)]
        role: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Package the source and bring the function and its triggers up to date
    Deploy {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Default region when the config sets none
        #[arg(long)]
        region: Option<String>,

        /// Default credentials profile when the config sets none
        #[arg(long)]
        profile: Option<String>,
    },

    /// Build the deployment archive without deploying it
    Package {
        /// Where to write the archive (default: <function>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// Show the remote state of the function and its triggers
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Default region when the config sets none
        #[arg(long)]
        region: Option<String>,

        /// Default credentials profile when the config sets none
        #[arg(long)]
        profile: Option<String>,
    },
}
