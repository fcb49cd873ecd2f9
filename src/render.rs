//! Plain-text board rendering.
//!
//! Draws the grid with `C` for the pursuer, `M` for the evader and `X` for a
//! capture. Rows are indexed by `x` and columns by `y`, so `(0,0)` is the
//! top-left corner.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::board::agent::Agent;
use crate::board::cell::Cell;
use crate::board::state::GameState;
use crate::game::Observer;

/// Renders `state` as a multi-line string, one row per line.
pub fn render_board(state: &GameState) -> String {
    let size = state.board_size();
    let side = usize::try_from(size).unwrap_or(0);
    let mut out = String::with_capacity(side.saturating_mul(2 * side + 1));
    for x in 0..size {
        for y in 0..size {
            let cell = Cell::new(x, y);
            let c = if state.is_terminal() && cell == state.pursuer() {
                'X'
            } else if cell == state.pursuer() {
                Agent::Pursuer.symbol()
            } else if cell == state.evader() {
                Agent::Evader.symbol()
            } else {
                '.'
            };
            if y > 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Observer that prints the board after every half-turn, optionally pausing
/// between frames.
///
/// Write errors cannot travel back through [`Observer`]; the first one is
/// logged and later frames are still attempted.
pub struct TextRenderer<W: Write> {
    out: W,
    pause: Duration,
    write_failed: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, pause: Duration) -> Self {
        TextRenderer {
            out,
            pause,
            write_failed: false,
        }
    }

    /// Returns true once any frame failed to write.
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn draw(&mut self, state: &GameState, turn: u32, mover: Option<Agent>) -> io::Result<()> {
        match mover {
            Some(agent) => writeln!(self.out, "turn {} ({} moved)", turn + 1, agent)?,
            None => writeln!(self.out, "start")?,
        }
        write!(self.out, "{}", render_board(state))?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Consumes the renderer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for TextRenderer<W> {
    fn on_state(&mut self, state: &GameState, turn: u32, mover: Option<Agent>) {
        if let Err(e) = self.draw(state, turn, mover) {
            if !self.write_failed {
                log::warn!("failed to render board: {}", e);
            }
            self.write_failed = true;
        }
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
    }
}
