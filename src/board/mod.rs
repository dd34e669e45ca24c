//! Board representation and game-state types.
//!
//! Contains the core data structures for territories, the map graph, cards,
//! orders, players and the overall game state.

pub mod card;
pub mod map;
pub mod order;
pub mod player;
pub mod state;
pub mod territory;

pub use card::{Card, CardKind, Deck, Hand, ALL_CARD_KINDS};
pub use map::Map;
pub use order::{Order, OrderKind, OrdersList};
pub use player::Player;
pub use state::GameState;
pub use territory::{Continent, Owner, PlayerId, Territory, TerritoryId};
