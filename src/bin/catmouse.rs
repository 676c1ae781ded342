//! catmouse CLI - Train and evaluate Q-learning pursuit agents
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for per-episode
//! diagnostics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catmouse")]
#[command(
    version,
    about = "Cat and mouse agents learning pursuit with Q-learning",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a cat and a mouse against each other
    Train(Box<catmouse::cli::commands::train::TrainArgs>),

    /// Evaluate trained agents without learning
    Evaluate(catmouse::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => catmouse::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => catmouse::cli::commands::evaluate::execute(args),
    }
}
