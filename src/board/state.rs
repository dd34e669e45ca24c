//! The shared world orders act on.
//!
//! `GameState` owns the map, the roster and the deck. All ownership changes go
//! through `set_owner`, which rewrites the territory's owner handle and both
//! players' membership sets together.

use std::collections::HashSet;

use super::card::Deck;
use super::map::Map;
use super::player::Player;
use super::territory::{Owner, PlayerId, Territory, TerritoryId};
use crate::error::GameError;

#[derive(Debug, Clone)]
pub struct GameState {
    pub map: Map,
    pub players: Vec<Player>,
    pub deck: Deck,
}

impl GameState {
    pub fn new(map: Map) -> Self {
        GameState {
            map,
            players: Vec::new(),
            deck: Deck::default(),
        }
    }

    /// Appends a player to the roster and returns its id.
    pub fn add_player(&mut self, name: impl Into<String>) -> PlayerId {
        let id = PlayerId(self.players.len());
        self.players.push(Player::new(id, name));
        id
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id.0).ok_or(GameError::PlayerNotFound(id.0))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(id.0)
            .ok_or(GameError::PlayerNotFound(id.0))
    }

    pub fn territory(&self, id: TerritoryId) -> Result<&Territory, GameError> {
        self.map.territory(id)
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> Result<&mut Territory, GameError> {
        self.map.territory_mut(id)
    }

    /// Transfers a territory to `owner`, keeping both membership sets in sync.
    pub fn set_owner(&mut self, territory: TerritoryId, owner: Owner) -> Result<(), GameError> {
        if let Owner::Player(p) = owner {
            self.player(p)?;
        }
        let previous = self.map.territory_mut(territory)?.owner.replace(owner);
        if let Some(prev) = previous.and_then(Owner::player) {
            if let Some(player) = self.players.get_mut(prev.0) {
                player.remove_territory(territory);
            }
        }
        if let Owner::Player(p) = owner {
            self.players[p.0].insert_territory(territory);
        }
        Ok(())
    }

    /// Gives `territory` to `player`, taking it from any previous owner.
    pub fn add_owned_territory(
        &mut self,
        player: PlayerId,
        territory: TerritoryId,
    ) -> Result<(), GameError> {
        self.set_owner(territory, Owner::Player(player))
    }

    /// Releases `territory` from `player` to the neutral owner. A territory
    /// the player does not hold is left untouched.
    pub fn remove_owned_territory(
        &mut self,
        player: PlayerId,
        territory: TerritoryId,
    ) -> Result<(), GameError> {
        if self.territory(territory)?.is_owned_by(player) {
            self.set_owner(territory, Owner::Neutral)?;
        }
        Ok(())
    }

    /// Territories the player owns, in id order.
    pub fn to_defend(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.players
            .get(player.0)
            .map(|p| p.territories().collect())
            .unwrap_or_default()
    }

    /// Territories adjacent to one the player owns but not owned by it, in
    /// discovery order without duplicates.
    pub fn to_attack(&self, player: PlayerId) -> Vec<TerritoryId> {
        let Some(p) = self.players.get(player.0) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for owned in p.territories() {
            let Ok(t) = self.map.territory(owned) else {
                continue;
            };
            for &n in &t.adjacent {
                if !p.owns(n) && seen.insert(n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Players still holding at least one territory, in roster order.
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.is_eliminated())
            .map(|p| p.id)
            .collect()
    }
}
