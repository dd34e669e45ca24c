//! Game start: territory distribution, starting pools and opening hands.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Deck, GameState, PlayerId, TerritoryId};
use crate::config::GameConfig;
use crate::error::GameError;

/// Deals every territory round-robin over a shuffled roster.
///
/// Territories are shuffled too, so each player ends up with
/// `len / players` or one more.
pub fn distribute_territories(state: &mut GameState, rng: &mut impl Rng) -> Result<(), GameError> {
    if state.players.is_empty() {
        return Ok(());
    }
    let mut territories: Vec<TerritoryId> = (0..state.map.len()).map(TerritoryId).collect();
    territories.shuffle(rng);
    let mut roster: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();
    roster.shuffle(rng);

    for (i, territory) in territories.into_iter().enumerate() {
        state.add_owned_territory(roster[i % roster.len()], territory)?;
    }
    Ok(())
}

/// Builds and shuffles a fresh deck, then deals the opening hands.
///
/// Dealing stops early if the deck runs out.
pub fn deal_cards(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) {
    state.deck = Deck::standard(config.deck_copies);
    state.deck.shuffle(rng);
    for _ in 0..config.starting_cards {
        for idx in 0..state.players.len() {
            match state.deck.draw() {
                Ok(card) => state.players[idx].hand.add(card),
                Err(e) => {
                    tracing::warn!(error = %e, "stopped dealing opening hands");
                    return;
                }
            }
        }
    }
}

/// Runs the whole game-start sequence.
pub fn start_game(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> Result<(), GameError> {
    distribute_territories(state, rng)?;
    for p in &mut state.players {
        p.add_reinforcements(config.initial_armies);
    }
    deal_cards(state, config, rng);
    for p in &state.players {
        tracing::info!(
            player = %p.id,
            name = %p.name,
            territories = p.territory_count(),
            pool = p.reinforcement_pool(),
            cards = p.hand.len(),
            "player ready"
        );
    }
    Ok(())
}
