//! catmouse engine library.
//!
//! A pursuer ("cat") hunts an evader ("mouse") on a square grid, both moving
//! one king step per turn. Exposes the board model, move generation, the
//! minimax search, the evader heuristic, the turn driver and the protocol
//! modules for use by the binaries, integration tests and benches.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod evader;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod render;
pub mod search;
