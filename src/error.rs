//! Error types shared across the engine.
//!
//! `GameError` is what lookups, card handling, command processing and
//! configuration loading return. `OrderError` is the reason an order failed
//! its preconditions; it never aborts a round, the order is simply skipped.

use thiserror::Error;

use crate::board::{CardKind, PlayerId, TerritoryId};

/// Why an order failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("territory {0} does not exist")]
    UnknownTerritory(TerritoryId),

    #[error("player {0} does not exist")]
    UnknownPlayer(PlayerId),

    #[error("player {0} has been eliminated")]
    Eliminated(PlayerId),

    #[error("territory {territory} is not owned by player {player}")]
    NotOwner {
        player: PlayerId,
        territory: TerritoryId,
    },

    #[error("army count must be positive")]
    NonPositiveArmies,

    #[error("requested {requested} armies but only {available} remain in the reinforcement pool")]
    InsufficientReinforcements { requested: u32, available: u32 },

    #[error("requested {requested} armies but territory {territory} holds {available}")]
    InsufficientArmies {
        territory: TerritoryId,
        requested: u32,
        available: u32,
    },

    #[error("territory {0} is neither owned nor attackable")]
    NotAttackable(TerritoryId),

    #[error("a truce with player {0} is in force this round")]
    Truce(PlayerId),

    #[error("source and target are both territory {0}")]
    SameTerritory(TerritoryId),

    #[error("territory {0} belongs to the issuing player")]
    OwnTerritory(TerritoryId),

    #[error("diplomacy cannot target its own issuer")]
    SelfTarget,
}

/// Errors surfaced to the caller of an engine operation.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("no territory at index {0}")]
    TerritoryNotFound(usize),

    #[error("no player at index {0}")]
    PlayerNotFound(usize),

    #[error("no map named '{0}'")]
    MapNotFound(String),

    #[error("map is invalid: {0}")]
    InvalidMap(String),

    #[error("the deck is empty")]
    EmptyDeck,

    #[error("index {index} out of range for a hand of {len} cards")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{card} card cannot be played with a {expected} target")]
    CardTargetMismatch {
        card: CardKind,
        expected: &'static str,
    },

    #[error("expected {expected} strategies, got {actual}")]
    StrategyCount { expected: usize, actual: usize },

    #[error("operation requires phase {expected}, engine is in {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
