//! Network CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game
//! - match: Play a series of games with alternating colors
//! - solve: Find the engine's move in a prepared position

mod config;
mod match_cmd;
mod play_cmd;
mod solve_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "network")]
#[command(about = "Network board game engine")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series of games
    Match(match_cmd::MatchArgs),
    /// Solve a position from a problem file
    Solve(solve_cmd::SolveArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Solve(args) => solve_cmd::run(args, cli.seed),
    }
}
