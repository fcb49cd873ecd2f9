//! catmouse -- a pursuit engine driven over a line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! A front end (renderer, game UI) sends the position, asks for the
//! pursuer's or the evader's move, and applies moves one turn at a time.

use std::io::{self, BufRead};

use catmouse::engine::Engine;
use catmouse::protocol::parser::{parse_command, Command};

/// Runs the main protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Hello => engine.handle_hello(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => engine.set_option(name, value),
            Command::NewGame => engine.new_game(),
            Command::Position { notation } => {
                if let Err(e) = engine.set_position(&notation) {
                    eprintln!("{}", e);
                }
            }
            Command::Move { agent, to } => {
                if let Err(e) = engine.apply_move(agent, to) {
                    eprintln!("move: {}", e);
                }
            }
            Command::Go(params) => engine.handle_go(&params, &mut out)?,
            Command::Evader => engine.handle_evader(&mut out)?,
            Command::Eval => engine.handle_eval(&mut out)?,
            Command::Show => engine.handle_show(&mut out)?,
            Command::Quit => break,
        }
    }

    Ok(())
}
