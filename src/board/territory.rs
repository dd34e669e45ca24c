//! Territories, continents and ownership handles.
//!
//! A territory never owns its owner: the owner is a `PlayerId` handle (or the
//! neutral marker) that only the ownership-transfer operations in
//! `GameState` rewrite.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a territory in its map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub usize);

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Index of a player in the game roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Who holds a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player(PlayerId),
    /// Blockaded territory held by nobody in the roster.
    Neutral,
}

impl Owner {
    /// Returns the owning player, or `None` for neutral territory.
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Owner::Player(p) => Some(p),
            Owner::Neutral => None,
        }
    }
}

/// A node of the map graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    #[serde(default)]
    pub armies: u32,
    /// Unset until the territory is first assigned at game start.
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub adjacent: Vec<TerritoryId>,
}

impl Territory {
    /// Creates an unowned, empty territory with no neighbours.
    pub fn new(id: TerritoryId, name: impl Into<String>) -> Self {
        Territory {
            id,
            name: name.into(),
            armies: 0,
            owner: None,
            adjacent: Vec::new(),
        }
    }

    pub fn is_adjacent_to(&self, other: TerritoryId) -> bool {
        self.adjacent.contains(&other)
    }

    /// Returns the owning player, if a player (not neutral) holds it.
    pub fn owning_player(&self) -> Option<PlayerId> {
        self.owner.and_then(Owner::player)
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owning_player() == Some(player)
    }
}

/// A named group of territories granting a bonus to whoever holds all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<TerritoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_territory_is_unassigned() {
        let t = Territory::new(TerritoryId(0), "Alaska");
        assert_eq!(t.armies, 0);
        assert!(t.owner.is_none());
        assert!(t.adjacent.is_empty());
        assert_eq!(t.owning_player(), None);
    }

    #[test]
    fn neutral_owner_has_no_player() {
        let mut t = Territory::new(TerritoryId(0), "Alaska");
        t.owner = Some(Owner::Neutral);
        assert_eq!(t.owning_player(), None);
        assert!(!t.is_owned_by(PlayerId(0)));

        t.owner = Some(Owner::Player(PlayerId(2)));
        assert!(t.is_owned_by(PlayerId(2)));
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(TerritoryId(7).to_string(), "T7");
        assert_eq!(PlayerId(0).to_string(), "P0");
    }
}
