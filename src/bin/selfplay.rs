//! Self-play game generation CLI.
//!
//! Plays pursuer-versus-evader games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N             Number of games to play (default: 10)
//!   --size N              Board side length (default: 7)
//!   --depth N             Pursuer search depth in plies (default: 3)
//!   --max-turns N         Turn limit per game (default: 10)
//!   --escape-threshold N  Turns survived that count as an escape (default: 7)
//!   --threads N           Number of parallel threads (default: 4)
//!   --seed N              Random seed, 0 for entropy (default: 0)
//!   --config FILE         Load settings from a JSON file; flags override it
//!   --output FILE         Output file path (default: stdout)
//!   --render              Print every board to stderr, playing games in order
//!   --pause MS            Delay between rendered boards (default: 0)
//!   --quiet               Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::{Duration, Instant};

use catmouse::config::GameConfig;
use catmouse::game::{self, GameRecord};
use catmouse::render::TextRenderer;

/// Settings given on the command line. `None` leaves the config value alone.
#[derive(Default)]
struct Args {
    games: Option<usize>,
    size: Option<i32>,
    depth: Option<u32>,
    max_turns: Option<u32>,
    escape_threshold: Option<u32>,
    threads: Option<usize>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    output_path: Option<String>,
    render: bool,
    pause_ms: u64,
    quiet: bool,
}

/// Parses the value following `flag`, exiting with a message if it is
/// missing or malformed.
fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse::<T>()) {
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            eprintln!("invalid {} value: '{}'", flag, args[i]);
            process::exit(1);
        }
        None => {
            eprintln!("missing value for {}", flag);
            process::exit(1);
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--games" => {
                i += 1;
                parsed.games = Some(value(&args, i, flag));
            }
            "--size" => {
                i += 1;
                parsed.size = Some(value(&args, i, flag));
            }
            "--depth" => {
                i += 1;
                parsed.depth = Some(value(&args, i, flag));
            }
            "--max-turns" => {
                i += 1;
                parsed.max_turns = Some(value(&args, i, flag));
            }
            "--escape-threshold" => {
                i += 1;
                parsed.escape_threshold = Some(value(&args, i, flag));
            }
            "--threads" => {
                i += 1;
                parsed.threads = Some(value(&args, i, flag));
            }
            "--seed" => {
                i += 1;
                parsed.seed = Some(value(&args, i, flag));
            }
            "--config" => {
                i += 1;
                parsed.config_path = Some(PathBuf::from(value::<String>(&args, i, flag)));
            }
            "--output" => {
                i += 1;
                parsed.output_path = Some(value(&args, i, flag));
            }
            "--pause" => {
                i += 1;
                parsed.pause_ms = value(&args, i, flag);
            }
            "--render" => parsed.render = true,
            "--quiet" => parsed.quiet = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

/// Builds the effective config: file (or defaults), then flags on top.
fn build_config(args: &Args) -> GameConfig {
    let mut config = match &args.config_path {
        Some(path) => match GameConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    if let Some(v) = args.games {
        config.num_games = v;
    }
    if let Some(v) = args.size {
        config.board_size = v;
    }
    if let Some(v) = args.depth {
        config.search_depth = v;
    }
    if let Some(v) = args.max_turns {
        config.max_turns = v;
    }
    if let Some(v) = args.escape_threshold {
        config.escape_threshold = v;
    }
    if let Some(v) = args.threads {
        config.threads = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        process::exit(1);
    }
    config
}

/// Plays every game in order, drawing each board to stderr.
fn play_rendered(config: &GameConfig, pause: Duration) -> Vec<GameRecord> {
    let mut renderer = TextRenderer::new(io::stderr(), pause);
    let mut games = Vec::with_capacity(config.num_games);
    for i in 0..config.num_games {
        match game::play_random_game(config, i, &mut renderer) {
            Ok(record) => {
                eprintln!(
                    "game {}: {:?}\n",
                    record.game_id,
                    record.outcome(config.escape_threshold)
                );
                games.push(record);
            }
            Err(e) => {
                eprintln!("game {} failed: {}", i, e);
                process::exit(1);
            }
        }
    }
    games
}

/// Plays all games, in parallel when configured, reporting progress.
fn play_batch(config: &GameConfig, quiet: bool) -> Vec<GameRecord> {
    let total = config.num_games;
    let mut games = Vec::with_capacity(total);
    let result = game::run_self_play_with_callback(config, |record| {
        if !quiet {
            eprintln!(
                "[{}/{}] game {}: {} turns, {:?}",
                games.len() + 1,
                total,
                record.game_id,
                record.turns,
                record.outcome(config.escape_threshold)
            );
        }
        games.push(record);
    });
    if let Err(e) = result {
        eprintln!("self-play failed: {}", e);
        process::exit(1);
    }
    games.sort_by_key(|g| g.game_id);
    games
}

fn main() {
    let args = parse_args();
    let config = build_config(&args);

    if !args.quiet {
        eprintln!(
            "Self-play: {} games, {}x{} board, depth {}, {} turns max, escape at {}, {} threads",
            config.num_games,
            config.board_size,
            config.board_size,
            config.search_depth,
            config.max_turns,
            config.escape_threshold,
            config.threads
        );
    }

    let start = Instant::now();
    let games = if args.render {
        play_rendered(&config, Duration::from_millis(args.pause_ms))
    } else {
        play_batch(&config, args.quiet)
    };
    let elapsed = start.elapsed();

    if !args.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        game::print_summary(&games, config.escape_threshold);
    }

    let written = match &args.output_path {
        Some(path) => File::create(path)
            .and_then(|file| game::write_jsonl(&games, &mut BufWriter::new(file))),
        None => game::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    match (written, &args.output_path) {
        (Err(e), _) => {
            eprintln!("failed to write output: {}", e);
            process::exit(1);
        }
        (Ok(()), Some(path)) if !args.quiet => {
            eprintln!("Wrote {} games to {}", games.len(), path);
        }
        _ => {}
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N             Number of games to play (default: 10)");
    eprintln!("  --size N              Board side length (default: 7)");
    eprintln!("  --depth N             Pursuer search depth in plies (default: 3)");
    eprintln!("  --max-turns N         Turn limit per game (default: 10)");
    eprintln!("  --escape-threshold N  Turns survived that count as an escape (default: 7)");
    eprintln!("  --threads N           Number of parallel threads (default: 4)");
    eprintln!("  --seed N              Random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE         Load settings from a JSON file; flags override it");
    eprintln!("  --output FILE         Output file path (default: stdout)");
    eprintln!("  --render              Print every board to stderr, playing games in order");
    eprintln!("  --pause MS            Delay between rendered boards (default: 0)");
    eprintln!("  --quiet               Suppress progress and summary output");
    eprintln!("  --help                Show this help");
}
