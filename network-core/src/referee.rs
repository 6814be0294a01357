//! Game referee
//!
//! Keeps the authoritative board, asks each player for a move in turn and
//! relays it to the other. The players' own boards are never trusted.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::Square;
use crate::game::{BoardState, GameResult, Grid, Move, Side};
use crate::network::find_network;
use crate::player::Player;

/// Moves (both sides counted) before a game is declared drawn
pub const DEFAULT_MAX_MOVES: usize = 200;

/// Occurrences of one position that draw the game
const REPETITION_LIMIT: u8 = 3;

/// Limits for a single game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Side making the first move
    pub opener: Side,
    /// Move cap; reaching it is a draw
    pub max_moves: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            opener: Side::FIRST_TO_MOVE,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }
}

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnd {
    Network,
    NoLegalMove,
    IllegalMove,
    MoveLimit,
    Repetition,
}

/// One move as played
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Complete record of a finished game
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRecord {
    pub result: GameResult,
    pub end: GameEnd,
    pub moves: Vec<PlayedMove>,
    /// Winning network from the winner's first goal, if the game ended on one
    pub network: Option<Vec<Square>>,
}

impl GameRecord {
    pub fn winner(&self) -> Option<Side> {
        self.result.winner()
    }
}

/// Play one game to completion. `on_move` sees every accepted move together
/// with the board after it.
pub fn play_game<F>(
    black: &mut dyn Player,
    white: &mut dyn Player,
    rules: &GameRules,
    mut on_move: F,
) -> GameRecord
where
    F: FnMut(Side, Move, &BoardState),
{
    let mut board = BoardState::new();
    let mut seen: FxHashMap<(Grid, Side), u8> = FxHashMap::default();
    let mut moves = Vec::new();
    let mut to_move = rules.opener;

    let (result, end) = loop {
        if moves.len() >= rules.max_moves {
            tracing::warn!(moves = moves.len(), "move limit reached, game drawn");
            break (GameResult::Draw, GameEnd::MoveLimit);
        }

        let (mover, other): (&mut dyn Player, &mut dyn Player) = match to_move {
            Side::Black => (&mut *black, &mut *white),
            Side::White => (&mut *white, &mut *black),
        };

        let Some(mv) = mover.choose_move() else {
            tracing::debug!(side = %to_move, "no legal move");
            break (GameResult::win_for(to_move.opponent()), GameEnd::NoLegalMove);
        };

        if !board.is_valid_move(to_move, mv) {
            tracing::warn!(side = %to_move, %mv, "illegal move, game forfeited");
            break (GameResult::win_for(to_move.opponent()), GameEnd::IllegalMove);
        }

        board.do_move(to_move, mv);
        let relayed = other.opponent_move(mv);
        debug_assert!(relayed, "{} rejected a move the referee accepted", other.side());
        moves.push(PlayedMove { side: to_move, mv });
        tracing::trace!(side = %to_move, %mv, "move played");
        on_move(to_move, mv, &board);

        if let Some(winner) = board.winner_after_move(to_move) {
            break (GameResult::win_for(winner), GameEnd::Network);
        }

        to_move = to_move.opponent();

        let count = seen.entry((*board.grid(), to_move)).or_insert(0);
        *count += 1;
        if *count >= REPETITION_LIMIT {
            tracing::warn!(moves = moves.len(), "position repeated, game drawn");
            break (GameResult::Draw, GameEnd::Repetition);
        }
    };

    let network = result
        .winner()
        .filter(|_| end == GameEnd::Network)
        .and_then(|side| find_network(&board, side))
        .map(|path| path.into_iter().map(|chip| chip.square).collect());

    GameRecord {
        result,
        end,
        moves,
        network,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{MachinePlayer, RandomPlayer};

    /// Replays a fixed list of moves, then claims to have none
    struct Scripted {
        side: Side,
        board: BoardState,
        script: std::vec::IntoIter<Move>,
    }

    impl Scripted {
        fn new(side: Side, moves: Vec<Move>) -> Self {
            Self {
                side,
                board: BoardState::new(),
                script: moves.into_iter(),
            }
        }
    }

    impl Player for Scripted {
        fn side(&self) -> Side {
            self.side
        }

        fn board(&self) -> &BoardState {
            &self.board
        }

        fn choose_move(&mut self) -> Option<Move> {
            let mv = self.script.next()?;
            self.board.do_move(self.side, mv);
            Some(mv)
        }

        fn force_move(&mut self, mv: Move) -> bool {
            self.board.do_move(self.side, mv);
            true
        }

        fn opponent_move(&mut self, mv: Move) -> bool {
            self.board.do_move(self.side.opponent(), mv);
            true
        }
    }

    #[test]
    fn test_network_ends_game() {
        let mut black = Scripted::new(
            Side::Black,
            [(4, 0), (4, 1), (6, 1), (6, 5), (4, 5), (4, 7)]
                .iter()
                .map(|&(x, y)| Move::add(x, y))
                .collect(),
        );
        let mut white = Scripted::new(
            Side::White,
            [(1, 1), (1, 3), (2, 5), (2, 6), (3, 3)]
                .iter()
                .map(|&(x, y)| Move::add(x, y))
                .collect(),
        );

        let record = play_game(&mut black, &mut white, &GameRules::default(), |_, _, _| {});
        assert_eq!(record.result, GameResult::BlackWins);
        assert_eq!(record.end, GameEnd::Network);
        assert_eq!(record.moves.len(), 11);
        let network = record.network.unwrap();
        assert_eq!(network.first(), Some(&Square::new(4, 0)));
        assert_eq!(network.last(), Some(&Square::new(4, 7)));
    }

    #[test]
    fn test_illegal_move_forfeits() {
        // black may not place in white's goal column
        let mut black = Scripted::new(Side::Black, vec![Move::add(0, 3)]);
        let mut white = Scripted::new(Side::White, vec![]);
        let record = play_game(&mut black, &mut white, &GameRules::default(), |_, _, _| {});
        assert_eq!(record.result, GameResult::WhiteWins);
        assert_eq!(record.end, GameEnd::IllegalMove);
        assert!(record.moves.is_empty());
    }

    #[test]
    fn test_out_of_moves_loses() {
        let mut black = Scripted::new(Side::Black, vec![Move::add(2, 2)]);
        let mut white = Scripted::new(Side::White, vec![]);
        let record = play_game(&mut black, &mut white, &GameRules::default(), |_, _, _| {});
        assert_eq!(record.result, GameResult::BlackWins);
        assert_eq!(record.end, GameEnd::NoLegalMove);
        assert_eq!(record.moves.len(), 1);
    }

    #[test]
    fn test_move_limit_draws() {
        let mut black = RandomPlayer::new(Side::Black, 1);
        let mut white = RandomPlayer::new(Side::White, 2);
        let rules = GameRules {
            max_moves: 4,
            ..Default::default()
        };
        let mut seen = 0;
        let record = play_game(&mut black, &mut white, &rules, |_, _, _| seen += 1);
        assert_eq!(record.result, GameResult::Draw);
        assert_eq!(record.end, GameEnd::MoveLimit);
        assert_eq!(record.moves.len(), 4);
        assert_eq!(seen, 4);
    }

    #[test]
    fn test_opener_moves_first() {
        let mut black = MachinePlayer::with_depth(Side::Black, 1);
        let mut white = MachinePlayer::with_depth(Side::White, 1);
        let rules = GameRules {
            opener: Side::White,
            max_moves: 1,
        };
        let record = play_game(&mut black, &mut white, &rules, |_, _, _| {});
        assert_eq!(record.moves[0].side, Side::White);
        assert_eq!(black.board().chip_count(Side::White), 1);
    }

    #[test]
    fn test_shuffling_chips_repeats() {
        let sq = Square::new;
        let black_setup = [(1, 1), (1, 3), (1, 5), (3, 1), (3, 5), (5, 1), (5, 3), (5, 5), (6, 7), (3, 0)];
        let white_setup = [(2, 2), (2, 4), (2, 6), (4, 2), (4, 6), (6, 2), (6, 4), (6, 6), (7, 1), (0, 1)];

        let mut black_moves: Vec<Move> = black_setup.iter().map(|&(x, y)| Move::add(x, y)).collect();
        let mut white_moves: Vec<Move> = white_setup.iter().map(|&(x, y)| Move::add(x, y)).collect();
        for _ in 0..3 {
            black_moves.push(Move::step(sq(1, 1), sq(1, 0)));
            white_moves.push(Move::step(sq(0, 1), sq(0, 3)));
            black_moves.push(Move::step(sq(1, 0), sq(1, 1)));
            white_moves.push(Move::step(sq(0, 3), sq(0, 1)));
        }

        let mut black = Scripted::new(Side::Black, black_moves);
        let mut white = Scripted::new(Side::White, white_moves);
        let record = play_game(&mut black, &mut white, &GameRules::default(), |_, _, _| {});
        assert_eq!(record.result, GameResult::Draw);
        assert_eq!(record.end, GameEnd::Repetition);
        assert_eq!(record.moves.len(), 28);
    }

    #[test]
    fn test_record_serializes() {
        let mut black = RandomPlayer::new(Side::Black, 3);
        let mut white = RandomPlayer::new(Side::White, 4);
        let rules = GameRules {
            max_moves: 6,
            ..Default::default()
        };
        let record = play_game(&mut black, &mut white, &rules, |_, _, _| {});
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["end"], "move_limit");
        assert_eq!(json["moves"].as_array().unwrap().len(), 6);
        assert_eq!(json["moves"][0]["side"], "black");
    }
}
