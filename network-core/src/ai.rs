//! CPU-based Alpha-Beta AI

use crate::board::{Square, BOARD_SIZE, MAX_CHIPS};
use crate::eval::{evaluate, positional_score, Heuristics, WIN_VALUE};
use crate::game::{BoardState, Move, Side};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Search depth once the opponent is one chip short of the cap
const NEAR_CAPACITY_DEPTH: u32 = 2;

/// Candidate opening squares for the second player
const CENTER_SQUARES: [Square; 4] = [
    Square::new(BOARD_SIZE / 2 - 1, BOARD_SIZE / 2 - 1),
    Square::new(BOARD_SIZE / 2 - 1, BOARD_SIZE / 2),
    Square::new(BOARD_SIZE / 2, BOARD_SIZE / 2 - 1),
    Square::new(BOARD_SIZE / 2, BOARD_SIZE / 2),
];

// ============================================================================
// SEARCH STATISTICS
// ============================================================================

/// Counters from a single root search
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Depth actually searched
    pub depth: u32,
    /// Nodes visited, root included
    pub nodes: u64,
    /// Nodes scored by the heuristic
    pub leaves: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    /// Score of the chosen move from the searching side's view
    pub score: f32,
}

/// Best known move at a node with its score
#[derive(Clone, Copy, Debug)]
struct Best {
    mv: Option<Move>,
    score: f32,
}

impl Best {
    fn score_only(score: f32) -> Self {
        Self { mv: None, score }
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player. The random source is only used for the opening move.
/// A depth of 0 searches as depth 1.
#[derive(Debug)]
pub struct AlphaBetaAI<R = ChaCha8Rng> {
    pub depth: u32,
    pub heuristics: Heuristics,
    rng: R,
}

impl AlphaBetaAI<ChaCha8Rng> {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_seed(depth, heuristics, 42)
    }

    pub fn with_seed(depth: u32, heuristics: Heuristics, seed: u64) -> Self {
        Self::with_rng(depth, heuristics, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> AlphaBetaAI<R> {
    pub fn with_rng(depth: u32, heuristics: Heuristics, rng: R) -> Self {
        Self {
            depth,
            heuristics,
            rng,
        }
    }

    /// Get best move for `side`. The board is left as it was found.
    pub fn best_move(&mut self, board: &mut BoardState, side: Side) -> Option<Move> {
        self.search_with_stats(board, side).0
    }

    /// Get best move for `side` along with search counters
    pub fn search_with_stats(&mut self, board: &mut BoardState, side: Side) -> (Option<Move>, SearchStats) {
        let mut stats = SearchStats::default();

        if side == Side::FIRST_TO_MOVE.opponent() && board.is_empty() {
            if let Some(&to) = CENTER_SQUARES.choose(&mut self.rng) {
                tracing::trace!(%side, x = to.x, y = to.y, "opening move");
                return (Some(Move::Add { to }), stats);
            }
        }

        let moves = board.valid_moves(side);
        let first = match moves.first() {
            Some(&mv) => mv,
            None => return (None, stats),
        };
        if moves.len() == 1 {
            return (Some(first), stats);
        }

        let depth = self.search_depth(board, side);
        let mut search = Search {
            side,
            heuristics: &self.heuristics,
            stats: SearchStats {
                depth,
                ..SearchStats::default()
            },
        };
        let best = search.minimax(board, side, f32::NEG_INFINITY, f32::INFINITY, depth);
        stats = search.stats;
        stats.score = best.score;

        tracing::debug!(
            %side,
            depth,
            nodes = stats.nodes,
            leaves = stats.leaves,
            cutoffs = stats.cutoffs,
            score = stats.score,
            "search complete"
        );

        // a network already on the board ends the search before any move is tried
        (Some(best.mv.unwrap_or(first)), stats)
    }

    /// Evaluate a position
    pub fn evaluate(&self, board: &mut BoardState, side: Side) -> f32 {
        evaluate(board, side, &self.heuristics)
    }

    /// Configured depth, cut to `NEAR_CAPACITY_DEPTH` once step moves are
    /// about to take over the opponent's move list
    fn search_depth(&self, board: &BoardState, side: Side) -> u32 {
        if board.chip_count(side.opponent()) >= MAX_CHIPS - 1 {
            tracing::trace!(%side, "opponent near chip cap, depth clamped");
            NEAR_CAPACITY_DEPTH
        } else {
            self.depth.max(1)
        }
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// State of one root search. Scores are always from `side`'s point of view.
struct Search<'a> {
    side: Side,
    heuristics: &'a Heuristics,
    stats: SearchStats,
}

impl Search<'_> {
    fn minimax(&mut self, board: &mut BoardState, color: Side, mut alpha: f32, mut beta: f32, depth: u32) -> Best {
        self.stats.nodes += 1;

        // opponent first: completing both networks loses
        if board.has_network(self.side.opponent()) {
            return Best::score_only(-WIN_VALUE);
        }
        if board.has_network(self.side) {
            return Best::score_only(WIN_VALUE);
        }

        if depth == 0 {
            self.stats.leaves += 1;
            return Best::score_only(positional_score(board, self.side, self.heuristics));
        }

        let moves = board.valid_moves(color);
        if moves.is_empty() {
            self.stats.leaves += 1;
            return Best::score_only(positional_score(board, self.side, self.heuristics));
        }

        let maximizing = color == self.side;
        let mut best = Best {
            mv: Some(moves[0]),
            score: if maximizing { alpha } else { beta },
        };

        for mv in moves {
            let reply = {
                let mut applied = board.apply(color, mv);
                self.minimax(&mut applied, color.opponent(), alpha, beta, depth - 1)
            };

            if maximizing && reply.score > best.score {
                alpha = reply.score;
                best = Best {
                    mv: Some(mv),
                    score: reply.score,
                };
            } else if !maximizing && reply.score < best.score {
                beta = reply.score;
                best = Best {
                    mv: Some(mv),
                    score: reply.score,
                };
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}

// ============================================================================
// TESTS
// ============================================================================
