//! Legal move generation.
//!
//! Both agents move like a chess king: one step in any of the eight
//! directions, clipped to the board. The same generator feeds the search and
//! the evader policy.

use crate::board::cell::{Cell, DIRECTIONS};

/// Returns every in-bounds king-move neighbour of `from`, in the fixed
/// order of [`DIRECTIONS`].
pub fn legal_moves(board_size: i32, from: Cell) -> Vec<Cell> {
    let mut moves = Vec::with_capacity(DIRECTIONS.len());
    for &(dx, dy) in DIRECTIONS.iter() {
        let to = from.offset(dx, dy);
        if to.in_bounds(board_size) {
            moves.push(to);
        }
    }
    moves
}

/// Number of legal moves from `from`, without allocating.
pub fn legal_move_count(board_size: i32, from: Cell) -> usize {
    DIRECTIONS
        .iter()
        .filter(|&&(dx, dy)| from.offset(dx, dy).in_bounds(board_size))
        .count()
}

/// Returns true if `to` is a legal single move from `from`.
pub fn is_legal(board_size: i32, from: Cell, to: Cell) -> bool {
    to.in_bounds(board_size) && from.is_adjacent_to(to)
}
