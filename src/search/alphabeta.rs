//! Depth-limited minimax with alpha-beta pruning.
//!
//! The pursuer is the maximizing side and the evader the minimizing side.
//! The minimizing branch is a worst-case model of the evader; it is
//! unrelated to the heuristic the evader actually plays in a game
//! (see `crate::evader`).

use crate::board::state::GameState;

/// Recursive tree walker that counts visited nodes.
///
/// With `prune` disabled the walk is a plain minimax over the full tree,
/// which is the reference the pruned search must agree with.
pub(crate) struct Searcher {
    prune: bool,
    pub(crate) nodes: u64,
}

impl Searcher {
    pub(crate) fn new(prune: bool) -> Self {
        Searcher { prune, nodes: 0 }
    }

    pub(crate) fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> f64 {
        self.nodes += 1;

        if depth == 0 || state.is_terminal() {
            return state.evaluate();
        }

        if maximizing {
            // No pursuer move at all is the worst case for the pursuer.
            let mut best = f64::NEG_INFINITY;
            for to in state.legal_moves(state.pursuer()) {
                let next = match state.apply_pursuer_move(to) {
                    Ok(s) => s,
                    Err(_) => continue,
                };
                let value = self.minimax(&next, depth - 1, alpha, beta, false);
                best = best.max(value);
                alpha = alpha.max(value);
                if self.prune && beta <= alpha {
                    break;
                }
            }
            best
        } else {
            // A stranded evader is the best case for the pursuer.
            let mut best = f64::INFINITY;
            for to in state.legal_moves(state.evader()) {
                let next = match state.apply_evader_move(to) {
                    Ok(s) => s,
                    Err(_) => continue,
                };
                let value = self.minimax(&next, depth - 1, alpha, beta, true);
                best = best.min(value);
                beta = beta.min(value);
                if self.prune && beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// Minimax value of `state` searched to `depth` plies inside the
/// `(alpha, beta)` window. Terminal states score `+inf` at any depth.
pub fn search(state: &GameState, depth: u32, alpha: f64, beta: f64, maximizing: bool) -> f64 {
    Searcher::new(true).minimax(state, depth, alpha, beta, maximizing)
}

/// Full-width minimax value of `state` with every cutoff disabled.
pub fn search_unpruned(state: &GameState, depth: u32, maximizing: bool) -> f64 {
    Searcher::new(false).minimax(state, depth, f64::NEG_INFINITY, f64::INFINITY, maximizing)
}
