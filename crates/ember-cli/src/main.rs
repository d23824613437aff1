//! Ember CLI - offline processing with the ember saturator.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ember")]
#[command(author, version, about = "Ember saturator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the saturator
    Process(commands::process::ProcessArgs),

    /// List the saturation algorithms
    Algorithms(commands::algorithms::AlgorithmsArgs),

    /// List or export factory presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Algorithms(args) => commands::algorithms::run(&args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
