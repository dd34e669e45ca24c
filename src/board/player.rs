//! Player state: hand, orders, owned territories, reinforcement pool and the
//! round-scoped truce set.

use std::collections::BTreeSet;

use super::card::Hand;
use super::order::OrdersList;
use super::territory::{PlayerId, TerritoryId};
use crate::error::OrderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Hand,
    pub orders: OrdersList,
    /// Membership side of territory ownership; `GameState` keeps it in sync
    /// with each territory's owner handle.
    territories: BTreeSet<TerritoryId>,
    reinforcement_pool: u32,
    /// Armies taken out of the pool by issued deploy orders that have not
    /// executed yet.
    committed: u32,
    /// Players this one may not attack, and who may not attack it, until the
    /// next issue-orders phase begins.
    cannot_attack: BTreeSet<PlayerId>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            hand: Hand::new(),
            orders: OrdersList::new(),
            territories: BTreeSet::new(),
            reinforcement_pool: 0,
            committed: 0,
            cannot_attack: BTreeSet::new(),
        }
    }

    pub fn territories(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories.iter().copied()
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn owns(&self, territory: TerritoryId) -> bool {
        self.territories.contains(&territory)
    }

    /// A player holding no territory takes no further part in the game.
    pub fn is_eliminated(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn reinforcement_pool(&self) -> u32 {
        self.reinforcement_pool
    }

    /// Grants armies to the pool (round start or a Reinforcement card).
    pub fn add_reinforcements(&mut self, armies: u32) {
        self.reinforcement_pool = self.reinforcement_pool.saturating_add(armies);
    }

    /// Takes armies out of the pool when a deploy order is issued.
    pub fn commit_reinforcements(&mut self, armies: u32) -> Result<(), OrderError> {
        if armies > self.reinforcement_pool {
            return Err(OrderError::InsufficientReinforcements {
                requested: armies,
                available: self.reinforcement_pool,
            });
        }
        self.reinforcement_pool -= armies;
        self.committed += armies;
        Ok(())
    }

    pub fn committed_reinforcements(&self) -> u32 {
        self.committed
    }

    /// Armies a deploy order may still place this round: committed ones
    /// first, then whatever is left in the pool.
    pub fn deployable(&self) -> u32 {
        self.committed.saturating_add(self.reinforcement_pool)
    }

    /// Pays for an executed deploy, committed armies first.
    pub(crate) fn spend_deployed(&mut self, armies: u32) {
        let from_committed = armies.min(self.committed);
        self.committed -= from_committed;
        self.reinforcement_pool = self.reinforcement_pool.saturating_sub(armies - from_committed);
    }

    /// Returns armies of deploys that never executed to the pool.
    pub(crate) fn release_committed(&mut self) {
        self.reinforcement_pool = self.reinforcement_pool.saturating_add(self.committed);
        self.committed = 0;
    }

    pub fn cannot_attack(&self, other: PlayerId) -> bool {
        self.cannot_attack.contains(&other)
    }

    pub fn truces(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.cannot_attack.iter().copied()
    }

    pub(crate) fn add_truce(&mut self, other: PlayerId) {
        self.cannot_attack.insert(other);
    }

    pub(crate) fn clear_truces(&mut self) {
        self.cannot_attack.clear();
    }

    pub(crate) fn insert_territory(&mut self, territory: TerritoryId) {
        self.territories.insert(territory);
    }

    pub(crate) fn remove_territory(&mut self, territory: TerritoryId) {
        self.territories.remove(&territory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_never_overdraws() {
        let mut p = Player::new(PlayerId(0), "Ada");
        p.add_reinforcements(10);
        assert_eq!(
            p.commit_reinforcements(12),
            Err(OrderError::InsufficientReinforcements { requested: 12, available: 10 })
        );
        assert_eq!(p.reinforcement_pool(), 10);
        assert!(p.commit_reinforcements(10).is_ok());
        assert_eq!(p.reinforcement_pool(), 0);
        assert_eq!(p.committed_reinforcements(), 10);
        assert_eq!(p.deployable(), 10);
    }

    #[test]
    fn deploys_spend_committed_armies_first() {
        let mut p = Player::new(PlayerId(0), "Ada");
        p.add_reinforcements(10);
        p.commit_reinforcements(4).unwrap();
        p.spend_deployed(6);
        assert_eq!(p.committed_reinforcements(), 0);
        assert_eq!(p.reinforcement_pool(), 4);

        p.commit_reinforcements(3).unwrap();
        p.release_committed();
        assert_eq!(p.committed_reinforcements(), 0);
        assert_eq!(p.reinforcement_pool(), 4);
    }

    #[test]
    fn truces_clear() {
        let mut p = Player::new(PlayerId(0), "Ada");
        p.add_truce(PlayerId(1));
        assert!(p.cannot_attack(PlayerId(1)));
        assert!(!p.cannot_attack(PlayerId(2)));
        p.clear_truces();
        assert!(!p.cannot_attack(PlayerId(1)));
    }

    #[test]
    fn new_player_is_eliminated_until_assigned() {
        let mut p = Player::new(PlayerId(0), "Ada");
        assert!(p.is_eliminated());
        p.insert_territory(TerritoryId(3));
        assert!(!p.is_eliminated());
        assert!(p.owns(TerritoryId(3)));
    }
}
