//! Position evaluation.
//!
//! Scores a state from the pursuer's perspective: capture is the best
//! possible outcome, otherwise the closer the evader the better.

pub(crate) mod heuristic;

pub use heuristic::{evaluate, CAPTURE_SCORE};
