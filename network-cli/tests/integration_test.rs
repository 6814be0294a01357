//! Integration tests for the Network engine
//!
//! Tests the full stack: board rules, network detection, AI players, the
//! referee and the `network` binary

use std::path::PathBuf;
use std::process::Command;

use network_core::{
    play_game, AiConfig, BoardState, GameEnd, GameRecord, GameResult, GameRules, Heuristics,
    MachinePlayer, Move, Player, RandomPlayer, Side, Square, MAX_CHIPS, WIN_VALUE,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const BLACK_NETWORK: [(i8, i8); 6] = [(4, 0), (4, 1), (6, 1), (6, 5), (4, 5), (4, 7)];

fn workspace_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join(relative)
}

fn network_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_network"))
}

/// Replay a record on a fresh board, checking every move as it goes
fn replay(record: &GameRecord, opener: Side) -> BoardState {
    let mut board = BoardState::new();
    let mut expected = opener;
    for played in &record.moves {
        assert_eq!(played.side, expected, "sides must alternate");
        assert!(
            board.is_valid_move(played.side, played.mv),
            "illegal {} by {}",
            played.mv,
            played.side
        );
        board.do_move(played.side, played.mv);
        assert!(board.chip_count(Side::Black) <= MAX_CHIPS);
        assert!(board.chip_count(Side::White) <= MAX_CHIPS);
        expected = expected.opponent();
    }
    board
}

// ============================================================================
// PLAYER ADAPTER TESTS
// ============================================================================

#[test]
fn test_players_stay_in_sync() {
    let mut black = MachinePlayer::with_depth(Side::Black, 1);
    let mut white = RandomPlayer::new(Side::White, 17);

    for _ in 0..6 {
        let mv = black.choose_move().expect("black has moves");
        assert!(white.opponent_move(mv));
        let mv = white.choose_move().expect("white has moves");
        assert!(black.opponent_move(mv));
        assert_eq!(black.board().grid(), white.board().grid());
    }
}

#[test]
fn test_machine_completes_network() {
    let mut black = AiConfig::alpha_beta(2).with_seed(1).build_player(Side::Black);
    for &(x, y) in &BLACK_NETWORK[..5] {
        assert!(black.force_move(Move::add(x, y)));
    }
    assert!(black.opponent_move(Move::add(3, 3)));

    let (mv, stats) = black.choose_move_with_stats();
    assert!(mv.is_some());
    assert_eq!(stats.score, WIN_VALUE);
    assert!(black.board().clone().has_network(Side::Black));
}

#[test]
fn test_step_moves_after_ten_chips() {
    let mut player = MachinePlayer::with_depth(Side::Black, 1);
    let squares = [(1, 1), (1, 3), (1, 5), (3, 1), (3, 5), (5, 1), (5, 3), (5, 5), (6, 7), (3, 0)];
    for (x, y) in squares {
        assert!(player.force_move(Move::add(x, y)));
    }
    assert!(!player.force_move(Move::add(2, 7)), "no adds once all chips are placed");

    let mv = player.choose_move().expect("steps are available");
    assert!(matches!(mv, Move::Step { .. }));
    assert_eq!(player.board().chip_count(Side::Black), MAX_CHIPS);
}

// ============================================================================
// FULL GAME TESTS
// ============================================================================

#[test]
fn test_machine_vs_random_game() {
    let mut black = AiConfig::alpha_beta(1).with_seed(3).build_player(Side::Black);
    let mut white = RandomPlayer::new(Side::White, 4);
    let rules = GameRules {
        max_moves: 60,
        ..Default::default()
    };

    let record = play_game(&mut black, &mut white, &rules, |_, _, _| {});
    assert!(!record.moves.is_empty());
    assert_ne!(record.result, GameResult::Ongoing);

    let mut board = replay(&record, Side::Black);
    assert_eq!(board.grid(), black.board().grid());
    if record.end == GameEnd::Network {
        let winner = record.winner().expect("network games have a winner");
        assert!(board.has_network(winner));
        assert!(record.network.is_some());
    }
    println!("Game ended: {:?} by {:?}, moves: {}", record.result, record.end, record.moves.len());
}

#[test]
fn test_white_opening_is_central() {
    let mut black = RandomPlayer::new(Side::Black, 8);
    let mut white = MachinePlayer::with_depth(Side::White, 3);
    let rules = GameRules {
        opener: Side::White,
        max_moves: 1,
    };

    let record = play_game(&mut black, &mut white, &rules, |_, _, _| {});
    let to = record.moves[0].mv.to();
    assert!((3..=4).contains(&to.x) && (3..=4).contains(&to.y), "{:?}", to);
}

#[test]
fn test_custom_heuristics_play_legal_games() {
    let heuristics = Heuristics {
        connection_weight: 1.0,
        path_weight: 8.0,
        mobility_weight: 0.0,
        goal_weight: 4.0,
    };
    let mut black = AiConfig::alpha_beta(1).with_heuristics(heuristics).with_seed(2).build_player(Side::Black);
    let mut white = AiConfig::alpha_beta(1).with_seed(5).build_player(Side::White);
    let rules = GameRules {
        max_moves: 30,
        ..Default::default()
    };

    let record = play_game(&mut black, &mut white, &rules, |_, _, _| {});
    replay(&record, Side::Black);
}

// ============================================================================
// BINARY TESTS
// ============================================================================

#[test]
fn test_solve_command() {
    let output = network_bin()
        .args(["solve", "--json"])
        .arg(workspace_file("problems/one_move_win.json"))
        .output()
        .expect("run network");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let answer: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON answer");
    assert_eq!(answer["side"], "black");
    let mv = answer["move"].as_str().expect("a move");
    assert!(["add 2 7", "add 4 7", "add 6 7"].contains(&mv), "unexpected {}", mv);
    assert_eq!(answer["stats"]["score"].as_f64(), Some(WIN_VALUE as f64));
}

#[test]
fn test_play_command_json() {
    let output = network_bin()
        .args(["play", "--black", "random", "--white", "random", "--max-moves", "20", "--seed", "9", "--json"])
        .output()
        .expect("run network");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let record: GameRecord = serde_json::from_slice(&output.stdout).expect("JSON record");
    assert!(record.moves.len() <= 20);
    replay(&record, Side::Black);
}

#[test]
fn test_match_command_with_config() {
    let output = network_bin()
        .args(["match", "--json", "--games", "2", "--depth", "1", "--config"])
        .arg(workspace_file("configs/machine_vs_random.json"))
        .output()
        .expect("run network");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON results");
    assert_eq!(results["total_games"], 2);
    assert_eq!(results["games"][1]["swapped"], true);
}

#[test]
fn test_bad_problem_file_fails() {
    let output = network_bin()
        .args(["solve", "no-such-problem.json"])
        .output()
        .expect("run network");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read problem"));
}

#[test]
fn test_find_network_from_first_goal() {
    let mut black = RandomPlayer::new(Side::Black, 1);
    for &(x, y) in &BLACK_NETWORK {
        assert!(black.force_move(Move::add(x, y)));
    }
    let found = network_core::find_network(black.board(), Side::Black).expect("network");
    let squares: Vec<Square> = found.iter().map(|chip| chip.square).collect();
    assert_eq!(squares.first(), Some(&Square::new(4, 0)));
    assert_eq!(squares.len(), 6);
}
