//! Order execution.
//!
//! `execute` re-validates first and only then mutates state; an order that
//! became invalid since issuance is returned as an error with nothing applied.

use std::fmt;

use super::combat::CombatPolicy;
use super::validate::validate;
use crate::board::{CardKind, GameState, Order, Owner, PlayerId, TerritoryId};
use crate::error::OrderError;

/// What an executed order did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Deployed {
        target: TerritoryId,
        armies: u32,
        total: u32,
    },
    Moved {
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    Conquered {
        source: TerritoryId,
        target: TerritoryId,
        previous_owner: Option<PlayerId>,
        survivors: u32,
        card: Option<CardKind>,
    },
    Repelled {
        source: TerritoryId,
        target: TerritoryId,
        attackers_lost: u32,
        defenders_lost: u32,
    },
    Bombed {
        target: TerritoryId,
        before: u32,
        after: u32,
    },
    Blockaded {
        target: TerritoryId,
        armies: u32,
    },
    Airlifted {
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    Truce {
        between: (PlayerId, PlayerId),
    },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Effect::Deployed { target, armies, total } => {
                write!(f, "deployed {armies} to {target}, now {total}")
            }
            Effect::Moved { source, target, armies } => {
                write!(f, "moved {armies} from {source} to {target}")
            }
            Effect::Conquered { source, target, previous_owner, survivors, card } => {
                write!(f, "conquered {target} from ")?;
                match previous_owner {
                    Some(p) => write!(f, "{p}")?,
                    None => f.write_str("neutral")?,
                }
                write!(f, " out of {source}, {survivors} armies occupy it")?;
                if let Some(card) = card {
                    write!(f, ", drew {card}")?;
                }
                Ok(())
            }
            Effect::Repelled { source, target, attackers_lost, defenders_lost } => write!(
                f,
                "attack from {source} on {target} repelled, attacker lost {attackers_lost}, defender lost {defenders_lost}"
            ),
            Effect::Bombed { target, before, after } => {
                write!(f, "bombed {target} from {before} to {after}")
            }
            Effect::Blockaded { target, armies } => {
                write!(f, "blockaded {target}, {armies} armies now neutral")
            }
            Effect::Airlifted { source, target, armies } => {
                write!(f, "airlifted {armies} from {source} to {target}")
            }
            Effect::Truce { between: (a, b) } => write!(f, "truce between {a} and {b}"),
        }
    }
}

/// Re-validates and applies one order.
pub fn execute(
    order: &Order,
    state: &mut GameState,
    combat: &mut dyn CombatPolicy,
) -> Result<Effect, OrderError> {
    validate(order, state)?;

    // Every id below was just checked by `validate`, so direct indexing is safe.
    let effect = match *order {
        Order::Deploy { issuer, target, armies } => {
            state.players[issuer.0].spend_deployed(armies);
            let t = &mut state.map.territories[target.0];
            t.armies = t.armies.saturating_add(armies);
            Effect::Deployed { target, armies, total: t.armies }
        }
        Order::Advance { issuer, source, target, armies } => {
            if state.map.territories[target.0].is_owned_by(issuer) {
                transfer(state, source, target, armies);
                Effect::Moved { source, target, armies }
            } else {
                attack(state, combat, issuer, source, target, armies)?
            }
        }
        Order::Bomb { target, .. } => {
            let t = &mut state.map.territories[target.0];
            let before = t.armies;
            t.armies /= 2;
            Effect::Bombed { target, before, after: t.armies }
        }
        Order::Blockade { target, .. } => {
            let t = &mut state.map.territories[target.0];
            t.armies = t.armies.saturating_mul(2);
            let armies = t.armies;
            state
                .set_owner(target, Owner::Neutral)
                .map_err(|_| OrderError::UnknownTerritory(target))?;
            Effect::Blockaded { target, armies }
        }
        Order::Airlift { source, target, armies, .. } => {
            transfer(state, source, target, armies);
            Effect::Airlifted { source, target, armies }
        }
        Order::Negotiate { issuer, target } => {
            state.players[issuer.0].add_truce(target);
            state.players[target.0].add_truce(issuer);
            Effect::Truce { between: (issuer, target) }
        }
    };

    Ok(effect)
}

fn transfer(state: &mut GameState, source: TerritoryId, target: TerritoryId, armies: u32) {
    state.map.territories[source.0].armies -= armies;
    let t = &mut state.map.territories[target.0];
    t.armies = t.armies.saturating_add(armies);
}

/// The attacking armies leave the source. If the defenders are wiped out
/// the survivors occupy the target and the attacker draws a card; otherwise
/// the survivors fall back to the source.
///
/// Callers have validated the order, so the ids are known to exist.
fn attack(
    state: &mut GameState,
    combat: &mut dyn CombatPolicy,
    issuer: PlayerId,
    source: TerritoryId,
    target: TerritoryId,
    armies: u32,
) -> Result<Effect, OrderError> {
    state.map.territories[source.0].armies -= armies;
    let defenders = state.map.territories[target.0].armies;
    let outcome = combat.resolve(armies, defenders);

    if !outcome.is_conquest() {
        let src = &mut state.map.territories[source.0];
        src.armies = src.armies.saturating_add(outcome.attackers_left);
        state.map.territories[target.0].armies = outcome.defenders_left;
        return Ok(Effect::Repelled {
            source,
            target,
            attackers_lost: armies - outcome.attackers_left,
            defenders_lost: defenders - outcome.defenders_left,
        });
    }

    let previous_owner = state.map.territories[target.0].owning_player();
    state.map.territories[target.0].armies = outcome.attackers_left;
    state
        .set_owner(target, Owner::Player(issuer))
        .map_err(|_| OrderError::UnknownTerritory(target))?;

    let card = match state.deck.draw() {
        Ok(card) => {
            state.players[issuer.0].hand.add(card);
            Some(card.kind)
        }
        Err(e) => {
            tracing::warn!(player = %issuer, "no card for conquest: {e}");
            None
        }
    };

    Ok(Effect::Conquered {
        source,
        target,
        previous_owner,
        survivors: outcome.attackers_left,
        card,
    })
}
