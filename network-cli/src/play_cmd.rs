//! Play command - one game between two configured players

use anyhow::Result;
use clap::Args;

use network_core::{play_game, GameEnd, GameRecord, Side};

use crate::config::{GameArgs, MatchConfig};

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Only print the result
    #[arg(long)]
    pub quiet: bool,

    /// Output the game record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = args.game.resolve(seed)?;

    tracing::info!(
        black = %config.black.describe(),
        white = %config.white.describe(),
        max_moves = config.rules.max_moves,
        "Starting game"
    );

    let show_moves = !args.quiet && !args.json;
    let record = play_single(&config, show_moves);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_result(&record);
    }

    Ok(())
}

/// Play the configured game, optionally printing the board after each move
fn play_single(config: &MatchConfig, show_moves: bool) -> GameRecord {
    let mut black = config.black.build(Side::Black, config.player_seed(0, 0));
    let mut white = config.white.build(Side::White, config.player_seed(0, 1));

    let mut ply = 0;
    play_game(black.as_mut(), white.as_mut(), &config.rules, |side, mv, board| {
        ply += 1;
        if show_moves {
            println!("{}. {} {}", ply, side, mv);
            println!("{}", board);
        }
    })
}

fn print_result(record: &GameRecord) {
    let reason = match record.end {
        GameEnd::Network => "network completed",
        GameEnd::NoLegalMove => "no legal move",
        GameEnd::IllegalMove => "illegal move",
        GameEnd::MoveLimit => "move limit",
        GameEnd::Repetition => "threefold repetition",
    };

    match record.winner() {
        Some(side) => println!("{} wins after {} moves ({})", side, record.moves.len(), reason),
        None => println!("Draw after {} moves ({})", record.moves.len(), reason),
    }

    if let Some(network) = &record.network {
        let squares: Vec<String> = network.iter().map(|sq| format!("({},{})", sq.x, sq.y)).collect();
        println!("Network: {}", squares.join(" "));
    }
}
