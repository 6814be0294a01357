//! Board state, move legality and chip bookkeeping

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Square, BOARD_SIZE, DIRECTIONS, MAX_CHIPS};
use crate::error::ParseError;
use crate::network;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// Side that makes the first move of a game
    pub const FIRST_TO_MOVE: Side = Side::Black;

    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Black's goals are the top and bottom rows, White's the left and right
    /// columns. Corners belong to both.
    pub fn in_goal(self, sq: Square) -> bool {
        match self {
            Side::Black => sq.y == 0 || sq.y == BOARD_SIZE - 1,
            Side::White => sq.x == 0 || sq.x == BOARD_SIZE - 1,
        }
    }

    /// Top row for Black, left column for White
    pub fn in_first_goal(self, sq: Square) -> bool {
        match self {
            Side::Black => sq.y == 0,
            Side::White => sq.x == 0,
        }
    }

    /// Whether two goal squares lie in the same goal of this side
    pub fn same_goal(self, a: Square, b: Square) -> bool {
        match self {
            Side::Black => a.y == b.y,
            Side::White => a.x == b.x,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" => Ok(Side::Black),
            "white" | "w" => Ok(Side::White),
            other => Err(ParseError::UnknownSide(other.to_string())),
        }
    }
}

/// Outcome of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    BlackWins,
    WhiteWins,
    Draw,
}

impl GameResult {
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::Black => GameResult::BlackWins,
            Side::White => GameResult::WhiteWins,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::BlackWins => Some(Side::Black),
            GameResult::WhiteWins => Some(Side::White),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

/// Snapshot of one occupied square. Produced from the grid on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chip {
    pub square: Square,
    pub side: Side,
}

impl Chip {
    pub const fn new(square: Square, side: Side) -> Self {
        Self { square, side }
    }
}

/// A move: place a new chip, or relocate one already on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Add { to: Square },
    Step { from: Square, to: Square },
}

impl Move {
    pub const fn add(x: i8, y: i8) -> Self {
        Move::Add { to: Square::new(x, y) }
    }

    pub const fn step(from: Square, to: Square) -> Self {
        Move::Step { from, to }
    }

    /// Square the chip ends up on
    pub fn to(&self) -> Square {
        match *self {
            Move::Add { to } | Move::Step { to, .. } => to,
        }
    }

    /// The move that takes the board back, for steps
    fn reversed(&self) -> Move {
        match *self {
            Move::Add { to } => Move::Add { to },
            Move::Step { from, to } => Move::Step { from: to, to: from },
        }
    }
}

/// `add X Y` or `step TO_X TO_Y FROM_X FROM_Y`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Add { to } => write!(f, "add {} {}", to.x, to.y),
            Move::Step { from, to } => {
                write!(f, "step {} {} {} {}", to.x, to.y, from.x, from.y)
            }
        }
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();
        let coords = parts
            .map(|p| p.parse::<i8>().map_err(|_| ParseError::BadCoordinate(p.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        match (kind.as_str(), coords.as_slice()) {
            ("add", &[x, y]) => Ok(Move::add(x, y)),
            ("add", _) => Err(ParseError::WrongArity {
                kind: "add",
                expected: 2,
                found: coords.len(),
            }),
            ("step", &[x1, y1, x2, y2]) => Ok(Move::step(Square::new(x2, y2), Square::new(x1, y1))),
            ("step", _) => Err(ParseError::WrongArity {
                kind: "step",
                expected: 4,
                found: coords.len(),
            }),
            _ => Err(ParseError::UnknownKind(kind)),
        }
    }
}

/// Grid contents, indexed `[x][y]`
pub type Grid = [[Option<Side>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

// ============================================================================
// BOARD STATE
// ============================================================================

/// Mutable game board. Chip lists are derived from the grid and rebuilt after
/// every mutation.
#[derive(Clone, Debug)]
pub struct BoardState {
    grid: Grid,
    black_chips: Vec<Chip>,
    white_chips: Vec<Chip>,
    /// Networks found by the last `has_network` call for each side
    black_networks: usize,
    white_networks: usize,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create an empty board
    pub fn new() -> Self {
        Self {
            grid: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            black_chips: Vec::with_capacity(MAX_CHIPS),
            white_chips: Vec::with_capacity(MAX_CHIPS),
            black_networks: 0,
            white_networks: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Side occupying a square, `None` if empty or off the board
    pub fn get(&self, sq: Square) -> Option<Side> {
        if sq.is_valid() {
            self.grid[sq.x as usize][sq.y as usize]
        } else {
            None
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Chips of one side in column-major order
    pub fn chips(&self, side: Side) -> &[Chip] {
        match side {
            Side::Black => &self.black_chips,
            Side::White => &self.white_chips,
        }
    }

    pub fn chip_count(&self, side: Side) -> usize {
        self.chips(side).len()
    }

    pub fn is_empty(&self) -> bool {
        self.black_chips.is_empty() && self.white_chips.is_empty()
    }

    /// Number of networks recorded by the last `has_network(side)` call
    pub fn network_count(&self, side: Side) -> usize {
        match side {
            Side::Black => self.black_networks,
            Side::White => self.white_networks,
        }
    }

    /// Chips of `side` lying in either of its goals
    pub fn chips_in_goal(&self, side: Side) -> usize {
        self.chips(side)
            .iter()
            .filter(|c| side.in_goal(c.square))
            .count()
    }

    // ========================================================================
    // CONNECTIVITY
    // ========================================================================

    /// For each direction (indexed like `DIRECTIONS`), the first chip seen
    /// from `sq` if it belongs to `side`. An opposing chip or the board edge
    /// blocks the line.
    pub fn connected_chips(&self, side: Side, sq: Square) -> [Option<Chip>; 8] {
        let mut cons = [None; 8];
        for dir in DIRECTIONS {
            for distance in 1..BOARD_SIZE {
                let target = sq.offset(dir, distance);
                if !target.is_valid() {
                    break;
                }
                match self.get(target) {
                    Some(owner) if owner == side => {
                        cons[dir.index()] = Some(Chip::new(target, side));
                        break;
                    }
                    Some(_) => break,
                    None => {}
                }
            }
        }
        cons
    }

    /// Pairwise connections between chips of `side`, each pair counted once
    pub fn connection_count(&self, side: Side) -> usize {
        let ends: usize = self
            .chips(side)
            .iter()
            .map(|c| self.connected_chips(side, c.square).iter().flatten().count())
            .sum();
        // every connection is seen from both ends
        ends / 2
    }

    /// Same-side chips touching `sq` horizontally, vertically or diagonally
    fn neighbors(&self, side: Side, sq: Square) -> impl Iterator<Item = Square> + '_ {
        DIRECTIONS
            .into_iter()
            .map(move |dir| sq.offset(dir, 1))
            .filter(move |&n| self.get(n) == Some(side))
    }

    // ========================================================================
    // NETWORKS
    // ========================================================================

    /// Whether `side` has a network. Records how many it has.
    pub fn has_network(&mut self, side: Side) -> bool {
        let count = network::count_networks(self, side);
        match side {
            Side::Black => self.black_networks = count,
            Side::White => self.white_networks = count,
        }
        count > 0
    }

    /// Referee check after `mover` has moved. Completing a network for both
    /// sides at once hands the game to the opponent.
    pub fn winner_after_move(&mut self, mover: Side) -> Option<Side> {
        if self.has_network(mover.opponent()) {
            Some(mover.opponent())
        } else if self.has_network(mover) {
            Some(mover)
        } else {
            None
        }
    }

    // ========================================================================
    // MOVE VALIDATION
    // ========================================================================

    /// Check a move against every rule without changing the board
    pub fn is_valid_move(&mut self, side: Side, mv: Move) -> bool {
        if let Move::Step { from, .. } = mv {
            if !from.is_valid() {
                return false;
            }
        }
        let to = mv.to();
        if !to.is_valid() {
            return false;
        }

        // also rules out the corners
        if side.opponent().in_goal(to) {
            return false;
        }

        if let Move::Step { from, .. } = mv {
            if self.get(from) != Some(side) {
                return false;
            }
        }

        // also stops a chip stepping onto its own square
        if self.get(to).is_some() {
            return false;
        }

        let count = self.chip_count(side);
        match mv {
            Move::Add { .. } if count >= MAX_CHIPS => return false,
            Move::Step { .. } if count < MAX_CHIPS => return false,
            _ => {}
        }

        !self.forms_cluster(side, mv)
    }

    /// Whether the move would leave three or more same-side chips touching.
    /// Only meaningful once every other check has passed.
    fn forms_cluster(&mut self, side: Side, mv: Move) -> bool {
        let board = self.apply(side, mv);
        let mut touching = 0;
        for neighbor in board.neighbors(side, mv.to()) {
            touching += 1;
            if touching >= 2 || board.neighbors(side, neighbor).nth(1).is_some() {
                return true;
            }
        }
        false
    }

    /// Every legal move for `side`: adds below the chip cap, steps at it
    pub fn valid_moves(&mut self, side: Side) -> Vec<Move> {
        let candidates: Vec<Move> = if self.chip_count(side) < MAX_CHIPS {
            Square::all().map(|to| Move::Add { to }).collect()
        } else {
            let sources: Vec<Square> = self.chips(side).iter().map(|c| c.square).collect();
            sources
                .into_iter()
                .flat_map(|from| Square::all().map(move |to| Move::Step { from, to }))
                .collect()
        };

        candidates
            .into_iter()
            .filter(|&mv| self.is_valid_move(side, mv))
            .collect()
    }

    /// Number of legal moves for `side`
    pub fn mobility(&mut self, side: Side) -> usize {
        self.valid_moves(side).len()
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Apply a move that has already been validated
    pub fn do_move(&mut self, side: Side, mv: Move) {
        if let Move::Step { from, .. } = mv {
            self.set(from, None);
        }
        self.set(mv.to(), Some(side));
        self.update_chips(side);
    }

    /// Take back a move previously applied with `do_move`
    pub fn undo_move(&mut self, side: Side, mv: Move) {
        match mv {
            Move::Step { .. } => self.do_move(side, mv.reversed()),
            Move::Add { to } => {
                debug_assert_eq!(self.get(to), Some(side), "undo of a move never applied");
                self.set(to, None);
                self.update_chips(side);
            }
        }
    }

    /// Apply a move for the lifetime of the returned guard
    pub fn apply(&mut self, side: Side, mv: Move) -> AppliedMove<'_> {
        self.do_move(side, mv);
        AppliedMove {
            board: self,
            side,
            mv,
        }
    }

    fn set(&mut self, sq: Square, value: Option<Side>) {
        self.grid[sq.x as usize][sq.y as usize] = value;
    }

    fn update_chips(&mut self, side: Side) {
        let grid = &self.grid;
        let chips = match side {
            Side::Black => &mut self.black_chips,
            Side::White => &mut self.white_chips,
        };
        chips.clear();
        chips.extend(
            Square::all()
                .filter(|sq| grid[sq.x as usize][sq.y as usize] == Some(side))
                .map(|sq| Chip::new(sq, side)),
        );
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..BOARD_SIZE {
            write!(f, " {}", x)?;
        }
        for y in 0..BOARD_SIZE {
            write!(f, "\n{}", y)?;
            for x in 0..BOARD_SIZE {
                let mark = match self.get(Square::new(x, y)) {
                    Some(Side::Black) => 'B',
                    Some(Side::White) => 'W',
                    None => '·',
                };
                write!(f, " {}", mark)?;
            }
        }
        Ok(())
    }
}

/// A move applied to a board; undone when dropped
pub struct AppliedMove<'a> {
    board: &'a mut BoardState,
    side: Side,
    mv: Move,
}

impl Deref for AppliedMove<'_> {
    type Target = BoardState;

    fn deref(&self) -> &BoardState {
        self.board
    }
}

impl DerefMut for AppliedMove<'_> {
    fn deref_mut(&mut self) -> &mut BoardState {
        self.board
    }
}

impl Drop for AppliedMove<'_> {
    fn drop(&mut self) {
        self.board.undo_move(self.side, self.mv);
    }
}

// ============================================================================
// TESTS
// ============================================================================
