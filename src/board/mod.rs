//! Board representation and game-state types.
//!
//! Contains grid cells, the two agents and the immutable game state.

pub mod agent;
pub mod cell;
pub mod state;

pub use agent::Agent;
pub use cell::{Cell, DIRECTIONS};
pub use state::{GameState, StateError, MAX_BOARD_SIZE};
