//! Heuristic evader policy.
//!
//! The evader is not searched. It runs away when it can, slips diagonally
//! past the pursuer when it cannot, and otherwise moves at random, never
//! stepping straight back to the cell it just left. Randomness comes from
//! the caller's generator so games can be replayed from a seed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::cell::Cell;
use crate::board::state::GameState;

/// Picks the evader's next cell, or `None` if it has no candidate move.
///
/// Candidates are the evader's legal moves minus its previous cell. In order
/// of preference:
/// 1. moves that strictly increase the distance to the pursuer;
/// 2. moves one diagonal step from the pursuer's current cell;
/// 3. any remaining candidate.
///
/// The pick within a tier is uniform. The result may be the pursuer's cell
/// when nothing better exists; the turn driver screens for that.
pub fn evader_choice(state: &GameState, rng: &mut impl Rng) -> Option<Cell> {
    if state.is_terminal() {
        return None;
    }

    let pursuer = state.pursuer();
    let candidates = candidates(state);
    let current = state.distance();

    let away: Vec<Cell> = candidates
        .iter()
        .copied()
        .filter(|c| c.distance(pursuer) > current)
        .collect();
    if let Some(&mv) = away.choose(rng) {
        return Some(mv);
    }

    let diagonal: Vec<Cell> = candidates
        .iter()
        .copied()
        .filter(|c| c.is_diagonal_to(pursuer))
        .collect();
    if let Some(&mv) = diagonal.choose(rng) {
        return Some(mv);
    }

    candidates.choose(rng).copied()
}

/// Uniform random evader move that neither lands on the pursuer nor
/// backtracks. Used when [`evader_choice`] comes up empty or would walk
/// into capture.
pub fn fallback_move(state: &GameState, rng: &mut impl Rng) -> Option<Cell> {
    if state.is_terminal() {
        return None;
    }
    let pursuer = state.pursuer();
    let safe: Vec<Cell> = candidates(state)
        .into_iter()
        .filter(|&c| c != pursuer)
        .collect();
    safe.choose(rng).copied()
}

/// The evader's legal moves without the anti-backtrack cell.
fn candidates(state: &GameState) -> Vec<Cell> {
    let mut moves = state.legal_moves(state.evader());
    if let Some(prev) = state.evader_prev() {
        moves.retain(|&c| c != prev);
    }
    moves
}
