//! Batch simulation between random bots.
//!
//! Plays complete seeded games on the built-in map, optionally in parallel,
//! and produces one serializable record per game. Useful for balance checks
//! of the combat and reinforcement settings and as a soak test of the
//! engine.

use std::fmt;
use std::io::Write;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Map;
use crate::config::GameConfig;
use crate::engine::{GameEngine, GamePhase};
use crate::error::GameError;
use crate::strategy::{PlayerStrategy, RandomStrategy};

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: usize,
    /// Bots per game (2 to 6).
    pub players: usize,
    /// Worker threads; 1 plays sequentially.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. 0 draws every seed from entropy.
    pub seed: u64,
    /// Rules for every game. Its own `seed` is overwritten per game.
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 10,
            players: 3,
            threads: 4,
            seed: 0,
            game: GameConfig::default(),
        }
    }
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub territories: usize,
    pub armies: u64,
    pub cards: usize,
}

/// The outcome of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub seed: u64,
    /// Winner's name, or `None` for a draw.
    pub winner: Option<String>,
    pub rounds: u32,
    pub players: Vec<PlayerRecord>,
    pub orders_executed: usize,
    pub orders_skipped: usize,
    pub requests_refused: usize,
}

fn game_seed(config: &SimulationConfig, game_id: usize) -> u64 {
    if config.seed != 0 {
        config.seed.wrapping_add(game_id as u64)
    } else {
        // Seed 0 means entropy to the engine, so never hand it out.
        rand::thread_rng().gen_range(1..u64::MAX)
    }
}

/// Plays one game from startup commands to the end.
pub fn play_game(config: &SimulationConfig, game_id: usize, seed: u64) -> Result<GameRecord, GameError> {
    let game_config = GameConfig {
        seed,
        ..config.game.clone()
    };
    let mut engine = GameEngine::new(game_config);
    engine.register_map(Map::classic());

    let mut lines = vec!["loadmap classic".to_string(), "validatemap".to_string()];
    lines.extend((1..=config.players).map(|i| format!("addplayer Bot{i}")));
    lines.push("gamestart".to_string());
    for line in &lines {
        let command = engine.process_command(line)?;
        if engine.processor().rejected().iter().any(|c| c.sequence() == command.sequence()) {
            return Err(GameError::InvalidCommand(format!(
                "'{}' rejected: {}",
                command.raw(),
                command.effect().unwrap_or_default()
            )));
        }
    }

    let mut strategies: Vec<Box<dyn PlayerStrategy>> = (0..config.players)
        .map(|i| Box::new(RandomStrategy::new(seed.wrapping_add(i as u64 + 1))) as Box<dyn PlayerStrategy>)
        .collect();

    let (mut executed, mut skipped, mut refused) = (0, 0, 0);
    while engine.phase() != GamePhase::Win {
        let summary = engine.play_round(&mut strategies)?;
        executed += summary.execution.executed();
        skipped += summary.execution.skipped();
        refused += summary.issued.refused;
    }

    let state = engine
        .state()
        .ok_or_else(|| GameError::InvalidCommand("game ended without a state".into()))?;
    let players = state
        .players
        .iter()
        .map(|p| PlayerRecord {
            name: p.name.clone(),
            territories: p.territory_count(),
            armies: p
                .territories()
                .filter_map(|t| state.map.territory(t).ok())
                .map(|t| u64::from(t.armies))
                .sum(),
            cards: p.hand.len(),
        })
        .collect();

    Ok(GameRecord {
        game_id,
        seed,
        winner: engine.winner().map(|w| state.players[w.0].name.clone()),
        rounds: engine.round(),
        players,
        orders_executed: executed,
        orders_skipped: skipped,
        requests_refused: refused,
    })
}

/// Plays every game and returns the records in game order.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_simulation(config: &SimulationConfig) -> Result<Vec<GameRecord>, GameError> {
    if config.threads > 1 {
        run_parallel(config)
    } else {
        (0..config.games)
            .map(|i| -> Result<GameRecord, GameError> {
                let record = play_game(config, i, game_seed(config, i))?;
                log_game(config, &record);
                Ok(record)
            })
            .collect()
    }
}

fn run_parallel(config: &SimulationConfig) -> Result<Vec<GameRecord>, GameError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| GameError::InvalidCommand(format!("cannot build thread pool: {e}")))?;

    pool.install(|| {
        (0..config.games)
            .into_par_iter()
            .map(|i| -> Result<GameRecord, GameError> {
                let record = play_game(config, i, game_seed(config, i))?;
                log_game(config, &record);
                Ok(record)
            })
            .collect()
    })
}

fn log_game(config: &SimulationConfig, record: &GameRecord) {
    tracing::info!(
        game = record.game_id + 1,
        of = config.games,
        winner = record.winner.as_deref().unwrap_or("draw"),
        rounds = record.rounds,
        "game finished"
    );
}

/// Writes records as JSONL, one object per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), GameError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Aggregate numbers over a batch of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationSummary {
    pub games: usize,
    pub draws: usize,
    pub average_rounds: f64,
    /// Wins per player name, sorted by name.
    pub wins: Vec<(String, usize)>,
}

pub fn summarize(games: &[GameRecord]) -> SimulationSummary {
    let mut wins = std::collections::BTreeMap::<String, usize>::new();
    for game in games {
        for p in &game.players {
            wins.entry(p.name.clone()).or_default();
        }
        if let Some(w) = &game.winner {
            *wins.entry(w.clone()).or_default() += 1;
        }
    }
    let rounds: u64 = games.iter().map(|g| u64::from(g.rounds)).sum();
    SimulationSummary {
        games: games.len(),
        draws: games.iter().filter(|g| g.winner.is_none()).count(),
        average_rounds: rounds as f64 / games.len().max(1) as f64,
        wins: wins.into_iter().collect(),
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Avg rounds/game: {:.1}", self.average_rounds)?;
        writeln!(f, "Draws: {}", self.draws)?;
        writeln!(f, "Win distribution:")?;
        for (name, count) in &self.wins {
            let pct = 100.0 * *count as f64 / self.games.max(1) as f64;
            writeln!(f, "  {name:>8}: {count} ({pct:.1}%)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(games: usize, threads: usize) -> SimulationConfig {
        SimulationConfig {
            games,
            players: 3,
            threads,
            seed: 99,
            game: GameConfig {
                max_rounds: 40,
                ..GameConfig::default()
            },
        }
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let games = run_simulation(&quick(3, 1)).unwrap();
        assert_eq!(games.len(), 3);
        assert!(games.iter().all(|g| g.rounds >= 1 && g.rounds <= 40));
        assert_eq!(games[2].seed, 101);
    }

    #[test]
    fn parallel_matches_sequential() {
        let seq = run_simulation(&quick(4, 1)).unwrap();
        let par = run_simulation(&quick(4, 2)).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn too_few_players_is_an_error() {
        let config = SimulationConfig {
            players: 1,
            ..quick(1, 1)
        };
        assert!(matches!(run_simulation(&config), Err(GameError::InvalidCommand(_))));
    }

    #[test]
    fn jsonl_lines_parse_back() {
        let games = run_simulation(&quick(2, 1)).unwrap();
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let parsed: Vec<GameRecord> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, games);
    }

    #[test]
    fn summary_counts_wins_and_draws() {
        let record = |winner: Option<&str>, rounds| GameRecord {
            game_id: 0,
            seed: 1,
            winner: winner.map(str::to_string),
            rounds,
            players: vec![
                PlayerRecord { name: "Bot1".into(), territories: 0, armies: 0, cards: 0 },
                PlayerRecord { name: "Bot2".into(), territories: 0, armies: 0, cards: 0 },
            ],
            orders_executed: 0,
            orders_skipped: 0,
            requests_refused: 0,
        };
        let summary = summarize(&[record(Some("Bot2"), 10), record(None, 30)]);
        assert_eq!(summary.games, 2);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.average_rounds, 20.0);
        assert_eq!(summary.wins, vec![("Bot1".to_string(), 0), ("Bot2".to_string(), 1)]);
        assert!(summary.to_string().contains("Draws: 1"));
    }
}
