//! Order issuance strategies.
//!
//! A strategy sees a read-only snapshot of the game through `PlayerView` and
//! answers with one order request at a time until it has nothing more to
//! issue. The engine turns requests into queued orders, so strategies never
//! touch game state directly.

pub mod random;
pub mod scripted;

use crate::board::{GameState, Hand, PlayerId, Territory, TerritoryId};
use crate::resolve::{projected_armies, CardTarget};

pub use random::RandomStrategy;
pub use scripted::ScriptedStrategy;

/// One order-construction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRequest {
    Deploy {
        target: TerritoryId,
        armies: u32,
    },
    Advance {
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    PlayCard {
        hand_index: usize,
        target: CardTarget,
    },
}

/// Read-only snapshot of the game from one player's seat.
#[derive(Clone, Copy)]
pub struct PlayerView<'a> {
    player: PlayerId,
    state: &'a GameState,
}

impl<'a> PlayerView<'a> {
    pub fn new(player: PlayerId, state: &'a GameState) -> Self {
        PlayerView { player, state }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn to_defend(&self) -> Vec<TerritoryId> {
        self.state.to_defend(self.player)
    }

    pub fn to_attack(&self) -> Vec<TerritoryId> {
        self.state.to_attack(self.player)
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&'a Territory> {
        self.state.map.territory(id).ok()
    }

    pub fn armies(&self, id: TerritoryId) -> u32 {
        self.territory(id).map_or(0, |t| t.armies)
    }

    /// Armies on `id` once this player's queued deploys have run.
    pub fn armies_after_deploys(&self, id: TerritoryId) -> u32 {
        projected_armies(self.state, self.player, id)
    }

    pub fn reinforcement_pool(&self) -> u32 {
        self.state.players.get(self.player.0).map_or(0, |p| p.reinforcement_pool())
    }

    pub fn hand(&self) -> Option<&'a Hand> {
        self.state.players.get(self.player.0).map(|p| &p.hand)
    }

    /// Orders already queued this round.
    pub fn queued_orders(&self) -> usize {
        self.state.players.get(self.player.0).map_or(0, |p| p.orders.len())
    }

    /// Other players still in the game.
    pub fn opponents(&self) -> Vec<PlayerId> {
        self.state
            .active_players()
            .into_iter()
            .filter(|&p| p != self.player)
            .collect()
    }

    pub fn cannot_attack(&self, other: PlayerId) -> bool {
        self.state
            .players
            .get(self.player.0)
            .is_some_and(|p| p.cannot_attack(other))
    }
}

/// Decides what a player issues during the issue-orders phase.
pub trait PlayerStrategy {
    /// Called once per round before the first request.
    fn begin_round(&mut self, _round: u32) {}

    /// The next request, or `None` when the player is done for the round.
    fn next_order(&mut self, view: &PlayerView<'_>) -> Option<OrderRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Map;

    #[test]
    fn view_reflects_player_seat() {
        let mut state = GameState::new(Map::classic());
        let a = state.add_player("A");
        let b = state.add_player("B");
        state.add_owned_territory(a, TerritoryId(0)).unwrap();
        state.add_owned_territory(b, TerritoryId(1)).unwrap();
        state.players[0].add_reinforcements(7);

        let view = PlayerView::new(a, &state);
        assert_eq!(view.to_defend(), vec![TerritoryId(0)]);
        assert!(view.to_attack().contains(&TerritoryId(1)));
        assert_eq!(view.reinforcement_pool(), 7);
        assert_eq!(view.opponents(), vec![b]);
        assert!(!view.cannot_attack(b));
    }
}
