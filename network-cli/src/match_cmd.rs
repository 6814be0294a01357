//! Match command - a series of games between two configured players
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use network_core::{play_game, GameEnd, GameResult, Side};

use crate::config::{GameArgs, MatchConfig};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Number of games to play (colors alternate)
    #[arg(long)]
    pub games: Option<usize>,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct MatchGame {
    game_number: usize,
    /// Whether the white config played black in this game
    swapped: bool,
    result: GameResult,
    end: GameEnd,
    moves: usize,
}

impl MatchGame {
    /// Winning config: 0 for the one configured as black, 1 for white
    fn winning_slot(&self) -> Option<usize> {
        let side = self.result.winner()?;
        let slot = match side {
            Side::Black => 0,
            Side::White => 1,
        };
        Some(if self.swapped { 1 - slot } else { slot })
    }
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    total_games: usize,
    black_wins: usize,
    white_wins: usize,
    draws: usize,
    /// Wins for the config given as `black` and the one given as `white`
    config_wins: [usize; 2],
    avg_moves: f32,
    games: Vec<MatchGame>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let mut config = args.game.resolve(seed)?;
    if let Some(games) = args.games {
        config.games = games;
    }

    tracing::info!(
        "Starting match: {} vs {} ({} games, max {} moves)",
        config.black.describe(),
        config.white.describe(),
        config.games,
        config.rules.max_moves
    );

    let results = play_match(&config, args.parallel, !args.json)?;

    report_results(&results, &config, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(config: &MatchConfig, parallel: bool, show_progress: bool) -> Result<MatchResults> {
    let progress = if show_progress {
        let bar = ProgressBar::new(config.games as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} games")?
                .progress_chars("=>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let run_one = |index: usize| {
        let game = play_single_game(config, index);
        tracing::debug!(
            "Game {}: {:?} by {:?} ({} moves)",
            game.game_number,
            game.result,
            game.end,
            game.moves
        );
        progress.inc(1);
        game
    };

    let games: Vec<MatchGame> = if parallel {
        (0..config.games).into_par_iter().map(run_one).collect()
    } else {
        (0..config.games).map(run_one).collect()
    };
    progress.finish_and_clear();

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, config: &MatchConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results, config);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play game `index`; odd games swap which config plays black
fn play_single_game(config: &MatchConfig, index: usize) -> MatchGame {
    let swapped = index % 2 == 1;
    let (black_config, white_config) = if swapped {
        (&config.white, &config.black)
    } else {
        (&config.black, &config.white)
    };
    let (black_slot, white_slot) = if swapped { (1, 0) } else { (0, 1) };

    let mut black = black_config.build(Side::Black, config.player_seed(index, black_slot));
    let mut white = white_config.build(Side::White, config.player_seed(index, white_slot));

    let record = play_game(black.as_mut(), white.as_mut(), &config.rules, |_, _, _| {});

    MatchGame {
        game_number: index + 1,
        swapped,
        result: record.result,
        end: record.end,
        moves: record.moves.len(),
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<MatchGame>) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let black_wins = count(GameResult::BlackWins);
    let white_wins = count(GameResult::WhiteWins);
    let draws = count(GameResult::Draw);

    let mut config_wins = [0; 2];
    for slot in games.iter().filter_map(MatchGame::winning_slot) {
        config_wins[slot] += 1;
    }

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        total_games: games.len(),
        black_wins,
        white_wins,
        draws,
        config_wins,
        avg_moves,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, config: &MatchConfig) {
    let total = results.total_games;

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("Black wins:  {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("White wins:  {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);
    println!();
    println!(
        "{} (black config): {} wins",
        config.black.describe(),
        results.config_wins[0]
    );
    println!(
        "{} (white config): {} wins",
        config.white.describe(),
        results.config_wins[1]
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(swapped: bool, result: GameResult) -> MatchGame {
        MatchGame {
            game_number: 1,
            swapped,
            result,
            end: GameEnd::Network,
            moves: 10,
        }
    }

    #[test]
    fn test_winning_slot_follows_swap() {
        assert_eq!(game(false, GameResult::BlackWins).winning_slot(), Some(0));
        assert_eq!(game(true, GameResult::BlackWins).winning_slot(), Some(1));
        assert_eq!(game(true, GameResult::WhiteWins).winning_slot(), Some(0));
        assert_eq!(game(false, GameResult::Draw).winning_slot(), None);
    }

    #[test]
    fn test_compute_match_statistics() {
        let results = compute_match_statistics(vec![
            game(false, GameResult::BlackWins),
            game(true, GameResult::BlackWins),
            game(false, GameResult::Draw),
            game(true, GameResult::WhiteWins),
        ]);
        assert_eq!(results.total_games, 4);
        assert_eq!(results.black_wins, 2);
        assert_eq!(results.white_wins, 1);
        assert_eq!(results.draws, 1);
        assert_eq!(results.config_wins, [2, 1]);
        assert_eq!(results.avg_moves, 10.0);
    }

    #[test]
    fn test_play_match_seeded_is_repeatable() {
        let mut config = MatchConfig {
            games: 2,
            seed: Some(3),
            ..Default::default()
        };
        config.black.kind = crate::config::PlayerKind::Random;
        config.white.kind = crate::config::PlayerKind::Random;
        config.rules.max_moves = 30;

        let first = play_match(&config, false, false).unwrap();
        let second = play_match(&config, true, false).unwrap();
        assert_eq!(first.total_games, 2);
        let summary = |r: &MatchResults| r.games.iter().map(|g| (g.result, g.moves)).collect::<Vec<_>>();
        assert_eq!(summary(&first), summary(&second));
    }
}
