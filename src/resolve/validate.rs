//! Order preconditions.
//!
//! `validate` is a pure check of an order against the current state and runs
//! again immediately before every execution. A deploy never places more than
//! the issuer's committed armies plus its remaining pool.
//!
//! `validate_issue` is what the issuance window runs. Deploys there have to
//! fit in the uncommitted pool, because issuing a deploy commits its armies.
//! Advances are checked against the source as it will stand once the
//! issuer's queued deploys have run, since deploys execute first.

use crate::board::{GameState, Order, Player, PlayerId, Territory, TerritoryId};
use crate::error::OrderError;

/// Checks the order against the current state without mutating anything.
pub fn validate(order: &Order, state: &GameState) -> Result<(), OrderError> {
    let issuer = active_issuer(state, order.issuer())?;

    match *order {
        Order::Deploy { target, armies, .. } => {
            owned(state, issuer, target)?;
            positive(armies)?;
            within_pool(armies, issuer.deployable())
        }
        Order::Advance { source, target, armies, .. } => {
            let src = owned(state, issuer, source)?;
            advance(state, issuer, source, target, armies, src.armies)
        }
        Order::Bomb { target, .. } => {
            let tgt = territory(state, target)?;
            if tgt.is_owned_by(issuer.id) {
                return Err(OrderError::OwnTerritory(target));
            }
            attackable(state, issuer, tgt)
        }
        Order::Blockade { target, .. } => owned(state, issuer, target).map(|_| ()),
        Order::Airlift { source, target, armies, .. } => {
            let src = owned(state, issuer, source)?;
            owned(state, issuer, target)?;
            if source == target {
                return Err(OrderError::SameTerritory(source));
            }
            positive(armies)?;
            enough_armies(src, armies)
        }
        Order::Negotiate { target, .. } => {
            if target == issuer.id {
                return Err(OrderError::SelfTarget);
            }
            state
                .players
                .get(target.0)
                .map(|_| ())
                .ok_or(OrderError::UnknownPlayer(target))
        }
    }
}

/// The issue-time check. Deploys must fit in the uncommitted pool and
/// advances may use armies the issuer has already queued to deploy.
pub fn validate_issue(order: &Order, state: &GameState) -> Result<(), OrderError> {
    match *order {
        Order::Deploy { armies, .. } => {
            let issuer = active_issuer(state, order.issuer())?;
            within_pool(armies, issuer.reinforcement_pool())?;
            validate(order, state)
        }
        Order::Advance { source, target, armies, .. } => {
            let issuer = active_issuer(state, order.issuer())?;
            owned(state, issuer, source)?;
            let available = projected_armies(state, issuer.id, source);
            advance(state, issuer, source, target, armies, available)
        }
        _ => validate(order, state),
    }
}

/// Armies on `territory` once every deploy `player` has queued to it runs.
pub fn projected_armies(state: &GameState, player: PlayerId, territory: TerritoryId) -> u32 {
    let on_board = state.map.territories.get(territory.0).map_or(0, |t| t.armies);
    let incoming = state.players.get(player.0).map_or(0, |p| {
        p.orders
            .iter()
            .filter_map(|o| match *o {
                Order::Deploy { target, armies, .. } if target == territory => Some(armies),
                _ => None,
            })
            .fold(0u32, u32::saturating_add)
    });
    on_board.saturating_add(incoming)
}

/// Boolean form of `validate`.
pub fn is_valid(order: &Order, state: &GameState) -> bool {
    validate(order, state).is_ok()
}

fn active_issuer(state: &GameState, id: PlayerId) -> Result<&Player, OrderError> {
    let player = state.players.get(id.0).ok_or(OrderError::UnknownPlayer(id))?;
    if player.is_eliminated() {
        return Err(OrderError::Eliminated(id));
    }
    Ok(player)
}

fn territory(state: &GameState, id: TerritoryId) -> Result<&Territory, OrderError> {
    state
        .map
        .territories
        .get(id.0)
        .ok_or(OrderError::UnknownTerritory(id))
}

fn owned<'a>(
    state: &'a GameState,
    issuer: &Player,
    id: TerritoryId,
) -> Result<&'a Territory, OrderError> {
    let t = territory(state, id)?;
    if !t.is_owned_by(issuer.id) {
        return Err(OrderError::NotOwner {
            player: issuer.id,
            territory: id,
        });
    }
    Ok(t)
}

fn advance(
    state: &GameState,
    issuer: &Player,
    source: TerritoryId,
    target: TerritoryId,
    armies: u32,
    available: u32,
) -> Result<(), OrderError> {
    positive(armies)?;
    if armies > available {
        return Err(OrderError::InsufficientArmies {
            territory: source,
            requested: armies,
            available,
        });
    }
    if source == target {
        return Err(OrderError::SameTerritory(source));
    }
    let tgt = territory(state, target)?;
    if tgt.is_owned_by(issuer.id) {
        return Ok(());
    }
    attackable(state, issuer, tgt)
}

fn within_pool(armies: u32, available: u32) -> Result<(), OrderError> {
    if armies > available {
        return Err(OrderError::InsufficientReinforcements {
            requested: armies,
            available,
        });
    }
    Ok(())
}

fn positive(armies: u32) -> Result<(), OrderError> {
    if armies == 0 {
        return Err(OrderError::NonPositiveArmies);
    }
    Ok(())
}

fn enough_armies(source: &Territory, armies: u32) -> Result<(), OrderError> {
    if armies > source.armies {
        return Err(OrderError::InsufficientArmies {
            territory: source.id,
            requested: armies,
            available: source.armies,
        });
    }
    Ok(())
}

/// The target must be in the issuer's toAttack set (adjacent to something
/// it owns) and must not belong to a player it has a truce with.
fn attackable(state: &GameState, issuer: &Player, target: &Territory) -> Result<(), OrderError> {
    if !target.adjacent.iter().any(|&n| issuer.owns(n)) {
        return Err(OrderError::NotAttackable(target.id));
    }
    if let Some(defender) = target.owning_player() {
        let truce = issuer.cannot_attack(defender)
            || state
                .players
                .get(defender.0)
                .is_some_and(|d| d.cannot_attack(issuer.id));
        if truce {
            return Err(OrderError::Truce(defender));
        }
    }
    Ok(())
}
