//! Conquest console.
//!
//! Reads startup commands from stdin, one per line, and prints each
//! command's recorded effect. After a successful `gamestart` the game is
//! played out by seeded random bots and the result is printed. `quit` ends
//! the loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use conquest::board::Map;
use conquest::command::CommandKind;
use conquest::config::GameConfig;
use conquest::engine::{GameEngine, GamePhase};
use conquest::error::GameError;
use conquest::log::{audit, init_tracing};
use conquest::strategy::{PlayerStrategy, RandomStrategy};

#[derive(Parser)]
#[command(name = "conquest")]
#[command(about = "Territory-conquest game console")]
struct Cli {
    /// Extra map to register, as JSON (repeatable)
    #[arg(long, value_name = "FILE")]
    map: Vec<PathBuf>,

    /// Game rules as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed, 0 for entropy (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
}

fn play_out<W: Write>(engine: &mut GameEngine, out: &mut W) -> Result<(), GameError> {
    let players = engine.state().map_or(0, |s| s.players.len());
    let base = engine.config().seed;
    let mut strategies: Vec<Box<dyn PlayerStrategy>> = (0..players)
        .map(|i| Box::new(RandomStrategy::new(base.wrapping_add(i as u64 + 1))) as Box<dyn PlayerStrategy>)
        .collect();

    let winner = engine.play_to_end(&mut strategies)?;
    audit(&*engine);
    let name = winner
        .and_then(|w| engine.state().and_then(|s| s.players.get(w.0)))
        .map(|p| p.name.clone());
    match name {
        Some(name) => writeln!(out, "{name} wins after {} rounds", engine.round())?,
        None => writeln!(out, "draw after {} rounds", engine.round())?,
    }
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), GameError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut engine = GameEngine::new(config);
    engine.register_map(Map::classic());
    for path in &cli.map {
        let map = Map::from_json_str(&std::fs::read_to_string(path)?)?;
        engine.register_map(map);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let before = engine.phase();
        let command = engine.process_command(&line)?;
        writeln!(out, "{}", command.effect().unwrap_or_default())?;
        out.flush()?;

        let started = command.kind() == Some(CommandKind::GameStart)
            && before == GamePhase::PlayersAdded
            && engine.phase() == GamePhase::AssignReinforcement;
        if started {
            play_out(&mut engine, &mut out)?;
        }
        if engine.exit_requested() {
            break;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
