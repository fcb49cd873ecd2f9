//! Adversarial search for the pursuer.
//!
//! `alphabeta` holds the recursive minimax walk; `root` drives one top-level
//! ply of it to pick a concrete move.

pub mod alphabeta;
pub mod root;

pub use alphabeta::{search, search_unpruned};
pub use root::{best_move, search_root, SearchInfo, SearchResult};
