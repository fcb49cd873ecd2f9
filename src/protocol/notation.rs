//! Position notation encoding and decoding.
//!
//! A compact one-token form of a `GameState`, in the spirit of chess FEN:
//!
//! `<size>/<pursuer>/<evader>/<evader_prev>`
//!
//! Cells are written `x,y`; a missing previous evader cell is `-`.
//! Example: `7/0,0/4,5/-` or `7/1,1/3,3/3,4`.

use crate::board::cell::Cell;
use crate::board::state::{GameState, StateError};

/// Errors that can occur during notation parsing.
#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("expected 4 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid board size: '{0}'")]
    InvalidSize(String),

    #[error("invalid cell: '{0}'")]
    InvalidCell(String),

    #[error("invalid position: {0}")]
    InvalidState(#[from] StateError),
}

/// Parses a cell section.
fn parse_cell(s: &str) -> Result<Cell, NotationError> {
    Cell::parse(s).ok_or_else(|| NotationError::InvalidCell(s.to_string()))
}

/// Parses a notation string into a validated `GameState`.
pub fn parse_position(s: &str) -> Result<GameState, NotationError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 4 {
        return Err(NotationError::WrongSectionCount(sections.len()));
    }

    let size: i32 = sections[0]
        .parse()
        .map_err(|_| NotationError::InvalidSize(sections[0].to_string()))?;
    let pursuer = parse_cell(sections[1])?;
    let evader = parse_cell(sections[2])?;
    let evader_prev = match sections[3] {
        "-" => None,
        prev => Some(parse_cell(prev)?),
    };

    Ok(GameState::with_history(size, pursuer, evader, evader_prev)?)
}

/// Encodes a `GameState` into notation.
pub fn encode_position(state: &GameState) -> String {
    let prev = match state.evader_prev() {
        Some(c) => c.to_string(),
        None => "-".to_string(),
    };
    format!(
        "{}/{}/{}/{}",
        state.board_size(),
        state.pursuer(),
        state.evader(),
        prev
    )
}
