//! Root move selection.
//!
//! Expands one ply for the acting agent and scores every successor with a
//! fresh full-window alpha-beta search.

use std::io::{self, Write};
use std::time::Instant;

use crate::board::agent::Agent;
use crate::board::cell::Cell;
use crate::board::state::GameState;

use super::alphabeta::Searcher;

/// Search statistics emitted via `info` lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchInfo {
    pub depth: u32,
    pub nodes: u64,
    pub score: f64,
    pub elapsed_ms: u64,
}

/// Result of a root search: the chosen move and associated info.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub best: Option<Cell>,
    pub score: f64,
    pub nodes: u64,
}

/// Runs the root search for the pursuer (`maximizing`) or the modeled
/// evader and writes one `info` line to `out`.
///
/// Only strictly better values replace the current best, so ties keep the
/// first move in generation order and a root whose every move scores the
/// starting bound (all captured, for a minimizing root) yields no move. A
/// `depth` of 0 still expands the root ply and scores successors statically.
pub fn search_root<W: Write>(
    state: &GameState,
    depth: u32,
    maximizing: bool,
    out: &mut W,
) -> SearchResult {
    let start = Instant::now();
    let mut searcher = Searcher::new(true);

    let mut best: Option<Cell> = None;
    let mut best_score = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    if !state.is_terminal() {
        let agent = if maximizing { Agent::Pursuer } else { Agent::Evader };
        let child_depth = depth.saturating_sub(1);

        for to in state.legal_moves(state.position(agent)) {
            let next = match state.apply_move(agent, to) {
                Ok(s) => s,
                Err(_) => continue,
            };
            let value = searcher.minimax(
                &next,
                child_depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                !maximizing,
            );
            let improves = if maximizing {
                value > best_score
            } else {
                value < best_score
            };
            if improves {
                best_score = value;
                best = Some(to);
            }
        }
    }

    let info = SearchInfo {
        depth,
        nodes: searcher.nodes,
        score: best_score,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    let _ = writeln!(
        out,
        "info depth {} nodes {} score {:.3} time {}",
        info.depth, info.nodes, info.score, info.elapsed_ms
    );

    SearchResult {
        best,
        score: best_score,
        nodes: searcher.nodes,
    }
}

/// Picks the acting agent's move, or `None` if the state is terminal, the
/// agent has nowhere to go, or no move beats the starting bound.
pub fn best_move(state: &GameState, depth: u32, maximizing: bool) -> Option<Cell> {
    search_root(state, depth, maximizing, &mut io::sink()).best
}
