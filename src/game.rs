//! Turn driver and self-play.
//!
//! Plays whole games by alternating the evader's heuristic move and the
//! pursuer's searched move, and records every turn. Many games can be played
//! concurrently with rayon; records are written as JSONL.
//!
//! The driver reports a raw turn count and a capture flag. Deciding what
//! counts as an escape is left to the caller via [`GameRecord::outcome`].

use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::agent::Agent;
use crate::board::cell::Cell;
use crate::board::state::{GameState, StateError};
use crate::config::GameConfig;
use crate::evader::{evader_choice, fallback_move};
use crate::search::best_move;

/// Receives every state the driver produces, strictly between core calls.
///
/// This is the seam for renderers and pacing; the core never calls back into
/// an observer while searching.
pub trait Observer {
    /// Called with the start state (`mover` is `None`) and after every
    /// half-turn with the agent that just moved.
    fn on_state(&mut self, state: &GameState, turn: u32, mover: Option<Agent>);
}

impl Observer for () {
    fn on_state(&mut self, _state: &GameState, _turn: u32, _mover: Option<Agent>) {}
}

/// Errors from a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("a self-play worker panicked; {played} of {expected} games were played")]
    WorkerPanicked { played: usize, expected: usize },
}

/// How a finished game is classified for a given escape threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Captured,
    Escaped,
    Undecided,
}

/// The moves made in one turn. `None` means the agent could not act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub evader_move: Option<Cell>,
    pub pursuer_move: Option<Cell>,
}

/// A complete game record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    pub start: GameState,
    /// One entry per turn played, including a final capturing turn.
    pub moves: Vec<TurnRecord>,
    /// Full turns completed without capture.
    pub turns: u32,
    /// Whether the game ended with the pursuer on the evader.
    pub captured: bool,
    pub final_state: GameState,
}

impl GameRecord {
    /// Classifies the game: captured, escaped once `turns` reaches
    /// `escape_threshold`, undecided otherwise.
    pub fn outcome(&self, escape_threshold: u32) -> Outcome {
        if self.captured {
            Outcome::Captured
        } else if self.turns >= escape_threshold {
            Outcome::Escaped
        } else {
            Outcome::Undecided
        }
    }
}

/// Draws a random start position with the agents more than one unit apart.
pub fn random_start(board_size: i32, rng: &mut impl Rng) -> Result<GameState, StateError> {
    if board_size < 2 {
        return Err(StateError::InvalidBoardSize(board_size));
    }
    loop {
        let pursuer = Cell::new(rng.gen_range(0..board_size), rng.gen_range(0..board_size));
        let evader = Cell::new(rng.gen_range(0..board_size), rng.gen_range(0..board_size));
        if pursuer.distance(evader) > 1.0 {
            return GameState::new(board_size, pursuer, evader);
        }
    }
}

/// Plays a single game from `start` and returns its record.
///
/// Each turn the evader moves first. If its policy yields nothing or the
/// pursuer's cell, a random safe move is used instead; if there is none the
/// evader stays put. The pursuer then moves by search at
/// `config.search_depth`. The game stops on capture or after
/// `config.max_turns` full turns.
pub fn play_game(
    config: &GameConfig,
    start: GameState,
    game_id: usize,
    rng: &mut impl Rng,
    observer: &mut impl Observer,
) -> Result<GameRecord, StateError> {
    let mut state = start;
    let mut turns = 0u32;
    let mut moves: Vec<TurnRecord> = Vec::new();

    observer.on_state(&state, turns, None);

    while !state.is_terminal() && turns < config.max_turns {
        let mut record = TurnRecord {
            turn: turns + 1,
            evader_move: None,
            pursuer_move: None,
        };

        let mut choice = evader_choice(&state, rng);
        if choice.is_none() || choice == Some(state.pursuer()) {
            choice = fallback_move(&state, rng);
        }
        match choice {
            Some(to) => {
                state = state.apply_evader_move(to)?;
                record.evader_move = Some(to);
            }
            None => log::debug!("game {}: evader stranded on turn {}", game_id, record.turn),
        }
        observer.on_state(&state, turns, Some(Agent::Evader));
        if state.is_terminal() {
            moves.push(record);
            break;
        }

        match best_move(&state, config.search_depth, true) {
            Some(to) => {
                state = state.apply_pursuer_move(to)?;
                record.pursuer_move = Some(to);
            }
            None => log::debug!("game {}: pursuer stranded on turn {}", game_id, record.turn),
        }
        observer.on_state(&state, turns, Some(Agent::Pursuer));
        moves.push(record);
        if state.is_terminal() {
            break;
        }

        turns += 1;
    }

    log::debug!(
        "game {}: {} after {} turns",
        game_id,
        if state.is_terminal() { "capture" } else { "no capture" },
        turns
    );

    Ok(GameRecord {
        game_id,
        start,
        moves,
        turns,
        captured: state.is_terminal(),
        final_state: state,
    })
}

/// Seeds the RNG for game `i`: fixed per game when `seed != 0`, so results do
/// not depend on thread scheduling.
fn game_rng(seed: u64, i: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(i as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays game `i` of a self-play run from a random start, reporting every
/// state to `observer`.
pub fn play_random_game(
    config: &GameConfig,
    i: usize,
    observer: &mut impl Observer,
) -> Result<GameRecord, StateError> {
    let mut rng = game_rng(config.seed, i);
    let start = random_start(config.board_size, &mut rng)?;
    play_game(config, start, i, &mut rng, observer)
}

/// Runs self-play generation, producing records ordered by game ID.
pub fn run_self_play(config: &GameConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game.
///
/// When `config.threads > 1`, games are played concurrently using rayon and
/// may complete out of order.
pub fn run_self_play_with_callback<F>(config: &GameConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, play_quietly, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &GameConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game = play_random_game(config, i, &mut ())?;
        on_game(game);
    }
    Ok(())
}

/// Plays game `i` without an observer.
fn play_quietly(config: &GameConfig, i: usize) -> Result<GameRecord, StateError> {
    play_random_game(config, i, &mut ())
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker threads.
fn run_self_play_parallel<F>(
    config: &GameConfig,
    play: fn(&GameConfig, usize) -> Result<GameRecord, StateError>,
    mut on_game: F,
) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel::<Result<GameRecord, StateError>>();

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            log::warn!("failed to build thread pool ({}), playing sequentially", e);
            return run_self_play_sequential(config, on_game);
        }
    };

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let _ = tx.send(play(&config_clone, i));
                });
        });
    });

    // Receive completed games on the calling thread and pass to callback.
    let mut first_error = None;
    let mut played = 0;
    for result in rx {
        match result {
            Ok(game) => {
                played += 1;
                on_game(game);
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if handle.join().is_err() {
        return Err(SelfPlayError::WorkerPanicked {
            played,
            expected: config.num_games,
        });
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate statistics over a batch of games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub captured: usize,
    pub escaped: usize,
    pub undecided: usize,
    /// Mean number of turns played per game, counting a capturing turn.
    pub avg_turns: f64,
}

/// Summarizes `games`, classifying each with `escape_threshold`.
pub fn summarize(games: &[GameRecord], escape_threshold: u32) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        captured: 0,
        escaped: 0,
        undecided: 0,
        avg_turns: 0.0,
    };
    let mut total_turns = 0usize;
    for game in games {
        total_turns += game.moves.len();
        match game.outcome(escape_threshold) {
            Outcome::Captured => summary.captured += 1,
            Outcome::Escaped => summary.escaped += 1,
            Outcome::Undecided => summary.undecided += 1,
        }
    }
    summary.avg_turns = total_turns as f64 / games.len().max(1) as f64;
    summary
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord], escape_threshold: u32) {
    let s = summarize(games, escape_threshold);
    let pct = |n: usize| 100.0 * n as f64 / s.games.max(1) as f64;
    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", s.games);
    eprintln!("Avg turns/game: {:.1}", s.avg_turns);
    eprintln!("Captured: {} ({:.1}%)", s.captured, pct(s.captured));
    eprintln!("Escaped: {} ({:.1}%)", s.escaped, pct(s.escaped));
    eprintln!("Undecided: {} ({:.1}%)", s.undecided, pct(s.undecided));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn config() -> GameConfig {
        GameConfig {
            num_games: 1,
            threads: 1,
            seed: 42,
            ..Default::default()
        }
    }

    /// Observer that remembers every state it sees.
    #[derive(Default)]
    struct Recorder {
        states: Vec<(GameState, Option<Agent>)>,
    }

    impl Observer for Recorder {
        fn on_state(&mut self, state: &GameState, _turn: u32, mover: Option<Agent>) {
            self.states.push((*state, mover));
        }
    }

    #[test]
    fn random_start_is_not_adjacent() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let s = random_start(7, &mut rng).unwrap();
            assert!(s.distance() > 1.0);
            assert_eq!(s.evader_prev(), None);
        }
        assert!(random_start(1, &mut rng).is_err());
    }

    #[test]
    fn game_respects_turn_limit() {
        let cfg = config();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = random_start(cfg.board_size, &mut rng).unwrap();
            let game = play_game(&cfg, start, 0, &mut rng, &mut ()).unwrap();
            assert!(game.turns <= cfg.max_turns);
            assert!(game.moves.len() as u32 <= cfg.max_turns);
            assert_eq!(game.captured, game.final_state.is_terminal());
            if !game.captured {
                assert_eq!(game.turns, cfg.max_turns);
            }
        }
    }

    #[test]
    fn adjacent_start_is_captured_in_first_turn() {
        // Evader boxed in the corner: every escape still leaves it adjacent.
        let cfg = config();
        let start = GameState::new(7, Cell::new(1, 1), Cell::new(0, 0)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let game = play_game(&cfg, start, 0, &mut rng, &mut ()).unwrap();
        assert!(game.captured);
        assert_eq!(game.turns, 0);
        assert_eq!(game.moves.len(), 1);
        assert_eq!(game.outcome(7), Outcome::Captured);
    }

    #[test]
    fn boxed_in_evader_takes_the_only_safe_cell() {
        // 2x2 board: (0,1) is a backtrack and (1,1) is the pursuer, so the
        // evader must go to (1,0), next to the pursuer. A one-ply pursuer
        // only sees the capture there.
        let cfg = GameConfig {
            board_size: 2,
            search_depth: 1,
            ..config()
        };
        let start =
            GameState::with_history(2, Cell::new(1, 1), Cell::new(0, 0), Some(Cell::new(0, 1)))
                .unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let game = play_game(&cfg, start, 0, &mut rng, &mut ()).unwrap();
            assert_eq!(
                game.moves,
                vec![TurnRecord {
                    turn: 1,
                    evader_move: Some(Cell::new(1, 0)),
                    pursuer_move: Some(Cell::new(1, 0)),
                }]
            );
            assert!(game.captured);
            assert_eq!(game.turns, 0);
        }
    }

    #[test]
    fn evader_always_has_a_safe_cell_on_playable_boards() {
        // Every cell has at least three neighbours, and at most two are
        // excluded, so the driver never leaves a live evader in place.
        let mut rng = StdRng::seed_from_u64(0);
        for size in 2..=3 {
            let cells: Vec<Cell> = (0..size)
                .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
                .collect();
            for &p in &cells {
                for &e in &cells {
                    if p == e {
                        continue;
                    }
                    let mut histories = vec![None];
                    histories.extend(cells.iter().filter(|c| c.is_adjacent_to(e)).map(|&c| Some(c)));
                    for prev in histories {
                        let s = GameState::with_history(size, p, e, prev).unwrap();
                        let mv = fallback_move(&s, &mut rng).unwrap();
                        assert_ne!(mv, p);
                        assert_ne!(Some(mv), prev);
                    }
                }
            }
        }
    }

    #[test]
    fn moves_are_legal_and_replayable() {
        let cfg = config();
        let mut rng = StdRng::seed_from_u64(9);
        let start = random_start(cfg.board_size, &mut rng).unwrap();
        let game = play_game(&cfg, start, 0, &mut rng, &mut ()).unwrap();

        let mut state = game.start;
        for turn in &game.moves {
            if let Some(to) = turn.evader_move {
                assert_ne!(to, state.pursuer());
                state = state.apply_checked(Agent::Evader, to).unwrap();
            }
            if let Some(to) = turn.pursuer_move {
                state = state.apply_checked(Agent::Pursuer, to).unwrap();
            }
        }
        assert_eq!(state, game.final_state);
    }

    #[test]
    fn observer_sees_every_half_turn() {
        let cfg = config();
        let mut rng = StdRng::seed_from_u64(5);
        let start = random_start(cfg.board_size, &mut rng).unwrap();
        let mut recorder = Recorder::default();
        let game = play_game(&cfg, start, 0, &mut rng, &mut recorder).unwrap();

        assert_eq!(recorder.states[0], (start, None));
        assert_eq!(recorder.states.last().unwrap().0, game.final_state);
        let half_turns = recorder.states.len() - 1;
        assert!(half_turns >= 2 * game.moves.len() - 1);
        assert!(half_turns <= 2 * game.moves.len());
    }

    #[test]
    fn outcome_uses_caller_threshold() {
        let state = GameState::new(7, Cell::new(0, 0), Cell::new(6, 6)).unwrap();
        let record = GameRecord {
            game_id: 0,
            start: state,
            moves: Vec::new(),
            turns: 6,
            captured: false,
            final_state: state,
        };
        assert_eq!(record.outcome(7), Outcome::Undecided);
        assert_eq!(record.outcome(6), Outcome::Escaped);
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let cfg = GameConfig {
            num_games: 3,
            threads: 1,
            seed: 99,
            ..Default::default()
        };
        let games = run_self_play(&cfg).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games.iter().map(|g| g.game_id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn parallel_run_matches_sequential_with_seed() {
        let seq = GameConfig {
            num_games: 4,
            threads: 1,
            seed: 77,
            ..Default::default()
        };
        let par = GameConfig { threads: 2, ..seq.clone() };
        assert_eq!(run_self_play(&seq).unwrap(), run_self_play(&par).unwrap());
    }

    fn panics_on_second_game(config: &GameConfig, i: usize) -> Result<GameRecord, StateError> {
        if i == 1 {
            panic!("game {} blew up", i);
        }
        play_quietly(config, i)
    }

    #[test]
    fn parallel_run_reports_worker_panic() {
        let cfg = GameConfig {
            num_games: 3,
            threads: 2,
            seed: 5,
            ..Default::default()
        };
        let mut seen = 0;
        let result = run_self_play_parallel(&cfg, panics_on_second_game, |_| seen += 1);
        match result {
            Err(SelfPlayError::WorkerPanicked { played, expected }) => {
                assert_eq!(expected, 3);
                assert_eq!(played, seen);
                assert!(played < 3);
            }
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_self_play(&config()).unwrap();
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert_eq!(output.lines().count(), 1);
        for line in output.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["game_id"], 0);
            assert!(value["moves"].is_array());
            assert!(value["captured"].is_boolean());
            assert_eq!(value["start"]["board_size"], 7);
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let cfg = GameConfig {
            num_games: 5,
            threads: 1,
            seed: 11,
            ..Default::default()
        };
        let games = run_self_play(&cfg).unwrap();
        let s = summarize(&games, cfg.escape_threshold);
        assert_eq!(s.games, 5);
        assert_eq!(s.captured + s.escaped + s.undecided, 5);
        assert!(s.avg_turns > 0.0);
    }
}
