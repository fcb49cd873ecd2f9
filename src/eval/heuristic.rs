//! Distance heuristic.
//!
//! The only term is the Euclidean pursuer/evader distance. There is no
//! mobility, cornering or positional component.

use crate::board::state::GameState;

/// Score of a captured position.
pub const CAPTURE_SCORE: f64 = f64::INFINITY;

/// Evaluates `state` for the pursuer: `+inf` on capture, else `-distance`.
pub fn evaluate(state: &GameState) -> f64 {
    if state.is_terminal() {
        return CAPTURE_SCORE;
    }
    -state.distance()
}
