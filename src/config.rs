//! Game configuration.
//!
//! Every field has a default, so an empty JSON object is a complete config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Which combat policy resolves attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatMode {
    /// Per-army kill rolls from a seeded RNG.
    Probabilistic,
    /// Rounded expected losses, no randomness.
    Expected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CombatConfig {
    pub mode: CombatMode,
    /// Chance that one attacking army destroys one defender.
    pub attacker_kill_chance: f64,
    /// Chance that one defending army destroys one attacker.
    pub defender_kill_chance: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            mode: CombatMode::Probabilistic,
            attacker_kill_chance: 0.6,
            defender_kill_chance: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Reinforcement pool every player starts the game with.
    pub initial_armies: u32,
    /// Cards dealt to each player at game start.
    pub starting_cards: usize,
    /// Floor of the per-round territory bonus.
    pub min_reinforcement: u32,
    /// Owned territories per reinforcement army.
    pub territories_per_army: u32,
    pub reinforcement_card_armies: u32,
    /// Copies of each card kind in a fresh deck.
    pub deck_copies: usize,
    /// Rounds played before the game is declared drawn.
    pub max_rounds: u32,
    /// RNG seed (0 = use entropy).
    pub seed: u64,
    pub combat: CombatConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_armies: 50,
            starting_cards: 2,
            min_reinforcement: 3,
            territories_per_army: 3,
            reinforcement_card_armies: 5,
            deck_copies: 5,
            max_rounds: 500,
            seed: 0,
            combat: CombatConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.initial_armies, 50);
        assert_eq!(config.combat.mode, CombatMode::Probabilistic);
    }

    #[test]
    fn partial_override() {
        let config =
            GameConfig::from_json_str(r#"{"seed": 42, "combat": {"mode": "expected"}}"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.combat.mode, CombatMode::Expected);
        assert_eq!(config.combat.attacker_kill_chance, 0.6);
        assert_eq!(config.max_rounds, 500);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(matches!(
            GameConfig::from_json_str(r#"{"armies": 3}"#),
            Err(GameError::Config(_))
        ));
    }
}
