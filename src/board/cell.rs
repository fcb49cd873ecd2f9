//! Grid coordinates and king-move geometry.
//!
//! A `Cell` is a signed `(x, y)` pair so that neighbour arithmetic can step
//! off the board and be clipped afterwards instead of underflowing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// King-move offsets in enumeration order: the four orthogonal steps
/// (up, down, left, right) followed by the four diagonals.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// A square on the board, 0-indexed on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Returns the cell displaced by `(dx, dy)`. The result may be off-board.
    pub const fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance between two cells.
    pub fn distance(self, other: Cell) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    /// Returns true if `other` is exactly one diagonal step away.
    pub fn is_diagonal_to(self, other: Cell) -> bool {
        (self.x - other.x).abs() == 1 && (self.y - other.y).abs() == 1
    }

    /// Returns true if `other` is one king move away (and not the same cell).
    pub fn is_adjacent_to(self, other: Cell) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    /// Returns true if the cell lies on a `board_size x board_size` grid.
    pub fn in_bounds(self, board_size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < board_size && self.y < board_size
    }

    /// Parses the `x,y` text form.
    pub fn parse(s: &str) -> Option<Cell> {
        let (x, y) = s.split_once(',')?;
        let x = x.trim().parse().ok()?;
        let y = y.trim().parse().ok()?;
        Some(Cell { x, y })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}
