//! Per-round bookkeeping: reinforcement income, truce reset and win detection.

use crate::board::{GameState, PlayerId};
use crate::config::GameConfig;

/// Armies a player earns at the start of a round.
///
/// `max(min_reinforcement, owned / territories_per_army)` plus the bonus of
/// every continent the player holds completely. Eliminated players earn 0.
pub fn reinforcements_for(state: &GameState, player: PlayerId, config: &GameConfig) -> u32 {
    let Some(p) = state.players.get(player.0) else {
        return 0;
    };
    if p.is_eliminated() {
        return 0;
    }

    let owned = p.territory_count() as u32;
    let base = (owned / config.territories_per_army.max(1)).max(config.min_reinforcement);
    let bonus: u32 = state
        .map
        .continents
        .iter()
        .filter(|c| c.territories.iter().all(|&t| p.owns(t)))
        .map(|c| c.bonus)
        .sum();
    base + bonus
}

/// Adds each active player's round income to its pool and returns the
/// amounts granted, in roster order.
pub fn assign_reinforcements(state: &mut GameState, config: &GameConfig) -> Vec<(PlayerId, u32)> {
    let grants: Vec<(PlayerId, u32)> = state
        .active_players()
        .into_iter()
        .map(|p| (p, reinforcements_for(state, p, config)))
        .collect();
    for &(p, armies) in &grants {
        state.players[p.0].add_reinforcements(armies);
    }
    grants
}

/// Clears every player's truce set. Runs on entry to the issue-orders phase.
pub fn reset_truces(state: &mut GameState) {
    for p in &mut state.players {
        p.clear_truces();
    }
}

/// Returns the winner once exactly one player still holds territory.
pub fn winner(state: &GameState) -> Option<PlayerId> {
    match state.active_players().as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Map, TerritoryId};

    fn classic_with_players() -> GameState {
        let mut state = GameState::new(Map::classic());
        state.add_player("A");
        state.add_player("B");
        state
    }

    #[test]
    fn minimum_income_applies() {
        let mut state = classic_with_players();
        state.add_owned_territory(PlayerId(0), TerritoryId(0)).unwrap();
        assert_eq!(reinforcements_for(&state, PlayerId(0), &GameConfig::default()), 3);
        assert_eq!(reinforcements_for(&state, PlayerId(1), &GameConfig::default()), 0);
    }

    #[test]
    fn continent_bonus_is_added() {
        let mut state = classic_with_players();
        // West (T4..T6, bonus 2) plus three more territories: 6 / 3 = 2, floored to 3.
        for t in [4, 5, 6, 0, 1, 9] {
            state.add_owned_territory(PlayerId(0), TerritoryId(t)).unwrap();
        }
        assert_eq!(reinforcements_for(&state, PlayerId(0), &GameConfig::default()), 3 + 2);

        // Twelve territories: 12 / 3 = 4, plus 3 + 2 + 4.
        for t in 0..12 {
            state.add_owned_territory(PlayerId(0), TerritoryId(t)).unwrap();
        }
        assert_eq!(reinforcements_for(&state, PlayerId(0), &GameConfig::default()), 4 + 9);
    }

    #[test]
    fn assign_grows_pools() {
        let mut state = classic_with_players();
        state.add_owned_territory(PlayerId(0), TerritoryId(0)).unwrap();
        state.add_owned_territory(PlayerId(1), TerritoryId(1)).unwrap();
        let grants = assign_reinforcements(&mut state, &GameConfig::default());
        assert_eq!(grants, vec![(PlayerId(0), 3), (PlayerId(1), 3)]);
        assert_eq!(state.players[1].reinforcement_pool(), 3);
    }

    #[test]
    fn winner_is_last_player_standing() {
        let mut state = classic_with_players();
        state.add_owned_territory(PlayerId(0), TerritoryId(0)).unwrap();
        state.add_owned_territory(PlayerId(1), TerritoryId(1)).unwrap();
        assert_eq!(winner(&state), None);
        state.add_owned_territory(PlayerId(0), TerritoryId(1)).unwrap();
        assert_eq!(winner(&state), Some(PlayerId(0)));
    }
}
