//! Text protocol handling.
//!
//! Implements the line protocol a front end uses to drive the engine one
//! call per turn: a compact position notation and the command parser for
//! the main loop.

pub mod notation;
pub mod parser;

pub use notation::{encode_position, parse_position, NotationError};
pub use parser::{parse_command, Command, GoParams};
