//! Square-grid geometry: board size, compass directions and goal regions

use serde::{Deserialize, Serialize};

/// Width and height of the board in squares
pub const BOARD_SIZE: i8 = 8;

/// Maximum number of chips a side may hold on the board
pub const MAX_CHIPS: usize = 10;

/// Minimum number of chips in a path for it to count as a network
pub const NETWORK_LENGTH: usize = 6;

/// A board square. Coordinates are signed so off-board squares can be named
/// and rejected; `x` grows to the right, `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// Square `distance` steps away in `direction` (may be off the board)
    pub fn offset(&self, direction: Direction, distance: i8) -> Square {
        let (dx, dy) = direction.delta();
        Square::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Iterate every on-board square, column by column (x outer, y inner)
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|x| (0..BOARD_SIZE).map(move |y| Square::new(x, y)))
    }
}

/// Compass direction away from a square.
/// Index order: 0=L, 1=UL, 2=U, 3=UR, 4=R, 5=DR, 6=D, 7=DL
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    UpLeft,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
}

/// All eight directions in index order
pub const DIRECTIONS: [Direction; 8] = [
    Direction::Left,
    Direction::UpLeft,
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
];

/// Direction vectors (dx, dy), indexed like `DIRECTIONS`
const DELTAS: [(i8, i8); 8] = [
    (-1, 0),  // L
    (-1, -1), // UL
    (0, -1),  // U
    (1, -1),  // UR
    (1, 0),   // R
    (1, 1),   // DR
    (0, 1),   // D
    (-1, 1),  // DL
];

impl Direction {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn delta(self) -> (i8, i8) {
        DELTAS[self.index()]
    }

    /// The direction pointing the other way
    pub fn opposite(self) -> Direction {
        DIRECTIONS[(self.index() + 4) % 8]
    }
}
