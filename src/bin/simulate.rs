//! Batch simulation CLI.
//!
//! Plays games between random bots and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use conquest::config::GameConfig;
use conquest::error::GameError;
use conquest::log::init_tracing;
use conquest::simulate::{self, SimulationConfig};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Play seeded games between random bots and emit JSONL records")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Bots per game (2 to 6)
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Worker threads; 1 plays sequentially
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Base seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Rounds before a game is declared drawn (overrides the config file)
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Game rules as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress the summary
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: Cli) -> Result<(), GameError> {
    let mut game = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(max_rounds) = cli.max_rounds {
        game.max_rounds = max_rounds;
    }
    let config = SimulationConfig {
        games: cli.games,
        players: cli.players,
        threads: cli.threads,
        seed: cli.seed,
        game,
    };

    tracing::info!(
        games = config.games,
        players = config.players,
        threads = config.threads,
        max_rounds = config.game.max_rounds,
        "starting simulation"
    );
    let start = Instant::now();
    let games = simulate::run_simulation(&config)?;
    let elapsed = start.elapsed().as_secs_f64();

    if !cli.quiet {
        eprintln!("Completed {} games in {:.1}s", games.len(), elapsed);
        eprint!("{}", simulate::summarize(&games));
    }

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            simulate::write_jsonl(&games, &mut writer)?;
            tracing::info!(path = %path.display(), games = games.len(), "records written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
