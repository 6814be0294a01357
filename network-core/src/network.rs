//! Path enumeration and network detection
//!
//! A path is a sequence of one side's chips where each chip sees the next
//! along a straight line, the line turns at every chip, and no chip appears
//! twice. A network is a path of at least `NETWORK_LENGTH` chips running from
//! one of the side's goals to the other and touching a goal only at its ends.

use crate::board::{Direction, DIRECTIONS, NETWORK_LENGTH};
use crate::game::{BoardState, Chip, Side};

/// Chips in connection order
pub type Path = Vec<Chip>;

/// Every path of `side`'s chips, including the single-chip ones
pub fn all_paths(board: &BoardState, side: Side) -> Vec<Path> {
    let mut paths = Vec::new();
    let total = board.chip_count(side);

    for &chip in board.chips(side) {
        let mut path = vec![chip];
        paths.push(path.clone());
        extend_paths(board, side, total, &mut path, None, &mut paths);
    }

    paths
}

/// Depth-first extension of `path`; every extension is recorded in `out`
fn extend_paths(
    board: &BoardState,
    side: Side,
    total: usize,
    path: &mut Path,
    last_dir: Option<Direction>,
    out: &mut Vec<Path>,
) {
    // every chip already used
    if path.len() == total {
        return;
    }

    let Some(&back) = path.last() else {
        debug_assert!(false, "extend_paths called with an empty path");
        return;
    };

    let cons = board.connected_chips(side, back.square);
    for dir in DIRECTIONS {
        let Some(next) = cons[dir.index()] else {
            continue;
        };
        if let Some(last) = last_dir {
            if dir == last || dir == last.opposite() {
                continue;
            }
        }
        if path.contains(&next) {
            continue;
        }

        path.push(next);
        out.push(path.clone());
        extend_paths(board, side, total, path, Some(dir), out);
        path.pop();
    }
}

/// Whether a path satisfies the network conditions for `side`
pub fn is_network(side: Side, path: &[Chip]) -> bool {
    if path.len() < NETWORK_LENGTH {
        return false;
    }

    let (first, last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (first.square, last.square),
        _ => return false,
    };

    if !side.in_goal(first) || !side.in_goal(last) || side.same_goal(first, last) {
        return false;
    }

    path[1..path.len() - 1]
        .iter()
        .all(|chip| !side.in_goal(chip.square))
}

/// Number of distinct networks `side` has. Only paths starting in the first
/// goal are counted, so a network and its reversal count once.
pub fn count_networks(board: &BoardState, side: Side) -> usize {
    all_paths(board, side)
        .iter()
        .filter(|path| path.first().is_some_and(|c| side.in_first_goal(c.square)))
        .filter(|path| is_network(side, path))
        .count()
}

/// First network found for `side`, oriented from its first goal
pub fn find_network(board: &BoardState, side: Side) -> Option<Path> {
    all_paths(board, side).into_iter().find(|path| {
        path.first().is_some_and(|c| side.in_first_goal(c.square)) && is_network(side, path)
    })
}

/// Length in chips of the longest path
pub fn longest_path_len(paths: &[Path]) -> usize {
    paths.iter().map(Vec::len).max().unwrap_or(0)
}
