//! Engine state management.
//!
//! Holds the current position, engine options and the evader's random
//! source between commands, and answers `go` (pursuer search), `evader`
//! (heuristic evader move) and the bookkeeping commands.

use std::collections::HashMap;
use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::agent::Agent;
use crate::board::cell::Cell;
use crate::board::state::{GameState, StateError};
use crate::evader::evader_choice;
use crate::protocol::notation::{encode_position, parse_position, NotationError};
use crate::protocol::parser::GoParams;
use crate::render::render_board;
use crate::search::search_root;

/// Default search depth in plies.
const DEFAULT_DEPTH: u32 = 3;

/// Deepest search the engine accepts; deeper requests are clamped.
const MAX_DEPTH: u32 = 10;

/// Errors from commands that change the engine's position.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no position set")]
    NoPosition,

    #[error(transparent)]
    State(#[from] StateError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub position: Option<GameState>,
    pub options: HashMap<String, String>,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with no position.
    pub fn new() -> Self {
        Engine {
            position: None,
            options: HashMap::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Resets the position for a new game. Options are kept.
    pub fn new_game(&mut self) {
        self.position = None;
    }

    /// Sets the current position from notation.
    pub fn set_position(&mut self, notation: &str) -> Result<(), NotationError> {
        self.position = Some(parse_position(notation)?);
        Ok(())
    }

    /// Sets an engine option. `Seed` reseeds the evader's random source.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        let value = value.unwrap_or_default();
        if name == "Seed" {
            match value.parse::<u64>() {
                Ok(seed) => self.rng = SmallRng::seed_from_u64(seed),
                Err(_) => eprintln!("invalid Seed value: '{}'", value),
            }
        }
        self.options.insert(name, value);
    }

    /// Returns the configured search depth from options, or the default.
    fn depth(&self) -> u32 {
        self.options
            .get("Depth")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DEPTH)
    }

    /// Applies a move for `agent`, rejecting anything that is not a legal
    /// king move from the agent's cell.
    pub fn apply_move(&mut self, agent: Agent, to: Cell) -> Result<(), EngineError> {
        let state = self.position.ok_or(EngineError::NoPosition)?;
        self.position = Some(state.apply_checked(agent, to)?);
        Ok(())
    }

    /// Handles the handshake: writes id, options, protocol_version, and hellook.
    pub fn handle_hello<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name catmouse")?;
        writeln!(out, "id author catmouse")?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {}",
            DEFAULT_DEPTH, MAX_DEPTH
        )?;
        writeln!(out, "option name Seed type spin default 0 min 0")?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "hellook")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `go`: searches the pursuer's move and writes `info` and
    /// `bestmove` lines.
    pub fn handle_go<W: Write>(&self, params: &GoParams, out: &mut W) -> io::Result<()> {
        let state = match &self.position {
            Some(s) => s,
            None => {
                eprintln!("go: no position set");
                return Ok(());
            }
        };

        let depth = params.depth.unwrap_or_else(|| self.depth()).clamp(1, MAX_DEPTH);
        let result = search_root(state, depth, true, out);
        match result.best {
            Some(cell) => writeln!(out, "bestmove {}", cell)?,
            None => writeln!(out, "bestmove none")?,
        }
        out.flush()
    }

    /// Handles `evader`: writes the heuristic evader move.
    pub fn handle_evader<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let state = match &self.position {
            Some(s) => s,
            None => {
                eprintln!("evader: no position set");
                return Ok(());
            }
        };
        match evader_choice(state, &mut self.rng) {
            Some(cell) => writeln!(out, "evadermove {}", cell)?,
            None => writeln!(out, "evadermove none")?,
        }
        out.flush()
    }

    /// Handles `eval`: writes the static evaluation of the position.
    pub fn handle_eval<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.position {
            Some(s) => writeln!(out, "eval {:.3}", s.evaluate())?,
            None => eprintln!("eval: no position set"),
        }
        out.flush()
    }

    /// Handles `show`: writes the notation and a text board.
    pub fn handle_show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.position {
            Some(s) => {
                writeln!(out, "position {}", encode_position(s))?;
                write!(out, "{}", render_board(s))?;
            }
            None => eprintln!("show: no position set"),
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn new_engine_has_no_state() {
        let engine = Engine::new();
        assert!(engine.position.is_none());
        assert!(engine.options.is_empty());
        assert_eq!(engine.depth(), DEFAULT_DEPTH);
    }

    #[test]
    fn new_game_resets_position() {
        let mut engine = Engine::new();
        engine.set_position("7/0,0/4,5/-").unwrap();
        engine.new_game();
        assert!(engine.position.is_none());
    }

    #[test]
    fn set_position_invalid_notation() {
        let mut engine = Engine::new();
        assert!(engine.set_position("garbage").is_err());
        assert!(engine.position.is_none());
    }

    #[test]
    fn set_option_stores_value() {
        let mut engine = Engine::new();
        engine.set_option("Depth".to_string(), Some("5".to_string()));
        assert_eq!(engine.options.get("Depth"), Some(&"5".to_string()));
        assert_eq!(engine.depth(), 5);
    }

    #[test]
    fn handle_go_outputs_bestmove() {
        let mut engine = Engine::new();
        engine.set_position("3/0,0/2,2/-").unwrap();
        let output = output_of(|out| engine.handle_go(&GoParams { depth: Some(2) }, out));
        assert!(output.contains("info depth 2"), "got: {}", output);
        assert!(output.lines().any(|l| l == "bestmove 1,1"), "got: {}", output);
    }

    #[test]
    fn handle_go_on_capture_reports_none() {
        let mut engine = Engine::new();
        engine.set_position("5/2,2/2,2/-").unwrap();
        let output = output_of(|out| engine.handle_go(&GoParams::default(), out));
        assert!(output.lines().any(|l| l == "bestmove none"));
    }

    #[test]
    fn handle_evader_moves_away() {
        let mut engine = Engine::new();
        engine.set_option("Seed".to_string(), Some("7".to_string()));
        engine.set_position("7/3,3/3,4/-").unwrap();
        let output = output_of(|out| engine.handle_evader(out));
        let cell = output
            .trim()
            .strip_prefix("evadermove ")
            .and_then(Cell::parse)
            .unwrap();
        assert!(cell.distance(Cell::new(3, 3)) > 1.0);
    }

    #[test]
    fn apply_move_checks_legality() {
        let mut engine = Engine::new();
        engine.set_position("7/0,0/4,5/-").unwrap();
        assert!(engine.apply_move(Agent::Pursuer, Cell::new(2, 2)).is_err());
        engine.apply_move(Agent::Evader, Cell::new(5, 5)).unwrap();
        let state = engine.position.unwrap();
        assert_eq!(state.evader(), Cell::new(5, 5));
        assert_eq!(state.evader_prev(), Some(Cell::new(4, 5)));
    }

    #[test]
    fn apply_move_without_position_is_an_error() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.apply_move(Agent::Evader, Cell::new(1, 1)),
            Err(EngineError::NoPosition)
        ));
        assert!(engine.position.is_none());
    }

    #[test]
    fn handle_eval_and_show() {
        let mut engine = Engine::new();
        engine.set_position("7/0,0/3,4/-").unwrap();
        assert_eq!(output_of(|out| engine.handle_eval(out)).trim(), "eval -5.000");
        let shown = output_of(|out| engine.handle_show(out));
        assert!(shown.starts_with("position 7/0,0/3,4/-\n"));
        assert_eq!(shown.lines().count(), 8);
    }

    #[test]
    fn handle_hello_outputs_handshake() {
        let engine = Engine::new();
        let output = output_of(|out| engine.handle_hello(out));
        assert!(output.contains("id name catmouse"));
        assert!(output.contains("protocol_version 1"));
        assert!(output.trim_end().ends_with("hellook"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        assert_eq!(output_of(|out| engine.handle_isready(out)).trim(), "readyok");
    }
}
