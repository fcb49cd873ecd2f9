//! Property tests for search and move generation over whole boards.

use rand::rngs::StdRng;
use rand::SeedableRng;

use catmouse::board::cell::Cell;
use catmouse::board::state::GameState;
use catmouse::config::GameConfig;
use catmouse::evader::evader_choice;
use catmouse::game::{play_game, Outcome};
use catmouse::movegen::legal_moves;
use catmouse::search::{best_move, search, search_unpruned};

/// Every (pursuer, evader) placement on a `size` board.
fn all_states(size: i32) -> Vec<GameState> {
    let cells: Vec<Cell> = (0..size)
        .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
        .collect();
    let mut states = Vec::new();
    for &p in &cells {
        for &e in &cells {
            states.push(GameState::new(size, p, e).unwrap());
        }
    }
    states
}

#[test]
fn pruning_never_changes_the_value() {
    for state in all_states(5) {
        for depth in 0..=3 {
            for maximizing in [true, false] {
                let pruned = search(&state, depth, f64::NEG_INFINITY, f64::INFINITY, maximizing);
                let full = search_unpruned(&state, depth, maximizing);
                assert_eq!(
                    pruned, full,
                    "depth {} maximizing {} on {:?}",
                    depth, maximizing, state
                );
            }
        }
    }
}

#[test]
fn terminal_states_score_capture_at_any_depth() {
    let state = GameState::new(5, Cell::new(2, 3), Cell::new(2, 3)).unwrap();
    for depth in 0..=4 {
        assert_eq!(
            search(&state, depth, f64::NEG_INFINITY, f64::INFINITY, true),
            f64::INFINITY
        );
        assert_eq!(search_unpruned(&state, depth, false), f64::INFINITY);
    }
}

#[test]
fn best_move_is_always_a_legal_step() {
    for state in all_states(4) {
        for depth in 1..=3 {
            match best_move(&state, depth, true) {
                Some(to) => {
                    assert!(!state.is_terminal());
                    assert!(legal_moves(state.board_size(), state.pursuer()).contains(&to));
                }
                None => assert!(state.is_terminal()),
            }
        }
    }
}

#[test]
fn legal_moves_stay_on_board_and_adjacent() {
    for size in 1..=6 {
        for x in 0..size {
            for y in 0..size {
                let from = Cell::new(x, y);
                let moves = legal_moves(size, from);
                assert!(moves.len() <= 8);
                for to in &moves {
                    assert!(to.in_bounds(size));
                    assert!(from.is_adjacent_to(*to));
                }
            }
        }
    }
}

#[test]
fn adjacent_evader_is_captured_at_every_depth() {
    let state = GameState::new(7, Cell::new(1, 1), Cell::new(1, 2)).unwrap();
    for depth in 1..=4 {
        assert_eq!(best_move(&state, depth, true), Some(Cell::new(1, 2)));
    }
}

#[test]
fn evader_choice_is_a_legal_step_that_does_not_backtrack() {
    let mut rng = StdRng::seed_from_u64(99);
    for state in all_states(4) {
        if state.is_terminal() {
            assert_eq!(evader_choice(&state, &mut rng), None);
            continue;
        }
        let first = legal_moves(state.board_size(), state.evader())[0];
        let moved = state.apply_evader_move(first).unwrap();
        if let Some(to) = evader_choice(&moved, &mut rng) {
            assert!(moved.evader().is_adjacent_to(to));
            assert_ne!(Some(to), moved.evader_prev());
        }
    }
}

#[test]
fn games_end_in_capture_or_at_the_turn_limit() {
    let config = GameConfig {
        board_size: 4,
        search_depth: 3,
        max_turns: 12,
        ..Default::default()
    };
    for seed in 0..8 {
        let start = GameState::new(4, Cell::new(0, 0), Cell::new(3, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let record = play_game(&config, start, 0, &mut rng, &mut ()).unwrap();
        if record.captured {
            assert_eq!(record.final_state.pursuer(), record.final_state.evader());
            assert_eq!(record.outcome(config.escape_threshold), Outcome::Captured);
        } else {
            assert_eq!(record.turns, config.max_turns);
            assert_eq!(record.outcome(config.escape_threshold), Outcome::Escaped);
        }
    }
}
