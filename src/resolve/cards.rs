//! Playing cards.
//!
//! Playing a card takes it out of the hand, returns it to the bottom of the
//! deck, and either queues the matching order or (for Reinforcement) grows
//! the reinforcement pool on the spot. Game legality of the parameters is not
//! checked here; the queued order validates itself when it executes.

use serde::{Deserialize, Serialize};

use crate::board::{CardKind, GameState, Order, PlayerId, TerritoryId};
use crate::error::GameError;

/// Caller-supplied parameters for a card play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTarget {
    /// Reinforcement takes no parameters.
    None,
    /// Bomb or Blockade.
    Territory(TerritoryId),
    /// Airlift.
    Transfer {
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    /// Diplomacy.
    Player(PlayerId),
}

/// The result of a successful card play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPlay {
    /// An order was appended to the player's orders list.
    Queued(Order),
    /// The reinforcement pool grew immediately.
    Reinforced { armies: u32 },
}

/// Builds the order a card of `kind` produces for `target`.
///
/// Returns `Ok(None)` for Reinforcement, which has no order.
pub fn card_order(
    kind: CardKind,
    issuer: PlayerId,
    target: CardTarget,
) -> Result<Option<Order>, GameError> {
    let order = match (kind, target) {
        (CardKind::Reinforcement, CardTarget::None) => return Ok(None),
        (CardKind::Bomb, CardTarget::Territory(target)) => Order::Bomb { issuer, target },
        (CardKind::Blockade, CardTarget::Territory(target)) => Order::Blockade { issuer, target },
        (CardKind::Airlift, CardTarget::Transfer { source, target, armies }) => {
            Order::Airlift { issuer, source, target, armies }
        }
        (CardKind::Diplomacy, CardTarget::Player(target)) => Order::Negotiate { issuer, target },
        (card, _) => {
            return Err(GameError::CardTargetMismatch {
                card,
                expected: expected_target(card),
            })
        }
    };
    Ok(Some(order))
}

const fn expected_target(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Reinforcement => "no",
        CardKind::Bomb | CardKind::Blockade => "territory",
        CardKind::Airlift => "transfer",
        CardKind::Diplomacy => "player",
    }
}

/// Plays the card at `hand_index` from `player`'s hand.
///
/// Fails without side effects if the index is out of range or the target
/// shape does not fit the card.
pub fn play_card(
    state: &mut GameState,
    player: PlayerId,
    hand_index: usize,
    target: CardTarget,
    reinforcement_armies: u32,
) -> Result<CardPlay, GameError> {
    let card = state.player(player)?.hand.get(hand_index)?;
    let order = card_order(card.kind, player, target)?;

    let p = state.player_mut(player)?;
    p.hand.remove(hand_index)?;
    let play = match order {
        Some(order) => {
            p.orders.add_order(order);
            CardPlay::Queued(order)
        }
        None => {
            p.add_reinforcements(reinforcement_armies);
            CardPlay::Reinforced {
                armies: reinforcement_armies,
            }
        }
    };
    state.deck.put_back(card);

    tracing::debug!(player = %player, card = %card.kind, ?play, "card played");
    Ok(play)
}
