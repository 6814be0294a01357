//! Position evaluation

use crate::game::{BoardState, Side};
use crate::network::{all_paths, longest_path_len};
use serde::{Deserialize, Serialize};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Weight for chip-to-chip connections
    pub connection_weight: f32,
    /// Weight for the longest path length
    pub path_weight: f32,
    /// Weight for mobility (legal move count)
    pub mobility_weight: f32,
    /// Weight for chips sitting in a goal
    pub goal_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            connection_weight: 10.0,
            path_weight: 2.6,
            mobility_weight: 2.0,
            goal_weight: 2.0,
        }
    }
}

/// Win value, above any heuristic score
pub const WIN_VALUE: f32 = 100000.0;

/// Evaluate position from `side`'s perspective. A network for the opponent
/// is checked first: if both sides have one, `side` has lost.
pub fn evaluate(board: &mut BoardState, side: Side, heuristics: &Heuristics) -> f32 {
    if board.has_network(side.opponent()) {
        return -WIN_VALUE;
    }
    if board.has_network(side) {
        return WIN_VALUE;
    }
    positional_score(board, side, heuristics)
}

/// Weighted sum of board statistics, each taken as mine minus opponent's.
/// Assumes neither side has a network.
pub(crate) fn positional_score(board: &mut BoardState, side: Side, heuristics: &Heuristics) -> f32 {
    let opponent = side.opponent();

    let connections = board.connection_count(side) as f32 - board.connection_count(opponent) as f32;

    let my_longest = longest_path_len(&all_paths(board, side));
    let opp_longest = longest_path_len(&all_paths(board, opponent));
    let longest = my_longest as f32 - opp_longest as f32;

    let mobility = board.mobility(side) as f32 - board.mobility(opponent) as f32;

    let in_goal = board.chips_in_goal(side) as f32 - board.chips_in_goal(opponent) as f32;

    heuristics.connection_weight * connections
        + heuristics.path_weight * longest
        + heuristics.mobility_weight * mobility
        + heuristics.goal_weight * in_goal
}
