//! Filtra CLI - run audio files through biquad filter graphs.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filtra")]
#[command(author, version, about = "Filtra filter graph CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through a filter graph
    Process(commands::process::ProcessArgs),

    /// List the available biquad kinds
    Kinds(commands::kinds::KindsArgs),

    /// Validate a preset and report its channel layout
    Check(commands::check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Kinds(args) => commands::kinds::run(args),
        Commands::Check(args) => commands::check::run(args),
    }
}
