//! Game state representation.
//!
//! Holds an immutable snapshot of the pursuit game: board size, both agents'
//! cells, and the evader's previous cell (used only for anti-backtracking).
//! Every move produces a new `GameState`; nothing is mutated in place.

use serde::Serialize;

use super::agent::Agent;
use super::cell::Cell;
use crate::eval;
use crate::movegen;

/// Largest accepted board side length.
pub const MAX_BOARD_SIZE: i32 = 1024;

/// Errors raised while building or advancing a game state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("cannot move from a terminal state")]
    TerminalState,

    #[error("board size must be between 1 and {max}, got {0}", max = MAX_BOARD_SIZE)]
    InvalidBoardSize(i32),

    #[error("cell {cell} is outside a {board_size}x{board_size} board")]
    OutOfBounds { cell: Cell, board_size: i32 },

    #[error("{agent} cannot move to {cell}")]
    IllegalMove { agent: Agent, cell: Cell },
}

/// Complete game state at a point in time.
///
/// Fields are private so that every instance has passed the bounds checks in
/// [`GameState::with_history`]. Successors are derived with
/// [`GameState::apply_pursuer_move`] and [`GameState::apply_evader_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    board_size: i32,
    pursuer: Cell,
    evader: Cell,
    evader_prev: Option<Cell>,
}

impl GameState {
    /// Creates the first state of a game (no evader history).
    pub fn new(board_size: i32, pursuer: Cell, evader: Cell) -> Result<Self, StateError> {
        Self::with_history(board_size, pursuer, evader, None)
    }

    /// Creates a state with an explicit previous evader cell.
    pub fn with_history(
        board_size: i32,
        pursuer: Cell,
        evader: Cell,
        evader_prev: Option<Cell>,
    ) -> Result<Self, StateError> {
        if !(1..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(StateError::InvalidBoardSize(board_size));
        }
        for cell in [Some(pursuer), Some(evader), evader_prev].into_iter().flatten() {
            if !cell.in_bounds(board_size) {
                return Err(StateError::OutOfBounds { cell, board_size });
            }
        }
        Ok(GameState {
            board_size,
            pursuer,
            evader,
            evader_prev,
        })
    }

    pub fn board_size(&self) -> i32 {
        self.board_size
    }

    pub fn pursuer(&self) -> Cell {
        self.pursuer
    }

    pub fn evader(&self) -> Cell {
        self.evader
    }

    pub fn evader_prev(&self) -> Option<Cell> {
        self.evader_prev
    }

    /// Returns the cell occupied by `agent`.
    pub fn position(&self, agent: Agent) -> Cell {
        match agent {
            Agent::Pursuer => self.pursuer,
            Agent::Evader => self.evader,
        }
    }

    /// True iff both agents occupy the same cell. Distance plays no part.
    pub fn is_terminal(&self) -> bool {
        self.pursuer == self.evader
    }

    /// Euclidean distance between pursuer and evader.
    pub fn distance(&self) -> f64 {
        self.pursuer.distance(self.evader)
    }

    /// All king-move neighbours of `pos` that lie on the board.
    pub fn legal_moves(&self, pos: Cell) -> Vec<Cell> {
        movegen::legal_moves(self.board_size, pos)
    }

    /// Moves the pursuer to `to`. The target is not checked against
    /// `legal_moves`; callers guarantee legality.
    pub fn apply_pursuer_move(&self, to: Cell) -> Result<GameState, StateError> {
        if self.is_terminal() {
            return Err(StateError::TerminalState);
        }
        Ok(GameState {
            pursuer: to,
            ..*self
        })
    }

    /// Moves the evader to `to`, recording its current cell as the previous
    /// one. The target is not checked against `legal_moves`.
    pub fn apply_evader_move(&self, to: Cell) -> Result<GameState, StateError> {
        if self.is_terminal() {
            return Err(StateError::TerminalState);
        }
        Ok(GameState {
            evader: to,
            evader_prev: Some(self.evader),
            ..*self
        })
    }

    /// Applies an unchecked move for either agent.
    pub fn apply_move(&self, agent: Agent, to: Cell) -> Result<GameState, StateError> {
        match agent {
            Agent::Pursuer => self.apply_pursuer_move(to),
            Agent::Evader => self.apply_evader_move(to),
        }
    }

    /// Applies a move after verifying it is one of the agent's legal moves.
    ///
    /// This is a hardened entry point for moves that originate outside the
    /// engine (protocol input). The search and the evader policy use the
    /// unchecked variants.
    pub fn apply_checked(&self, agent: Agent, to: Cell) -> Result<GameState, StateError> {
        if self.is_terminal() {
            return Err(StateError::TerminalState);
        }
        if !movegen::is_legal(self.board_size, self.position(agent), to) {
            return Err(StateError::IllegalMove { agent, cell: to });
        }
        self.apply_move(agent, to)
    }

    /// Heuristic score from the pursuer's point of view.
    pub fn evaluate(&self) -> f64 {
        eval::evaluate(self)
    }
}
