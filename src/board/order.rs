//! Order types and the per-player orders list.
//!
//! An order is plain data naming its issuer and the territories or player it
//! involves; it holds handles, never references into the game state.
//! Validation and execution live in `crate::resolve`.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::territory::{PlayerId, TerritoryId};
use crate::log::Loggable;

/// The kind of an order, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Deploy,
    Advance,
    Bomb,
    Blockade,
    Airlift,
    Negotiate,
}

impl OrderKind {
    pub const fn name(self) -> &'static str {
        match self {
            OrderKind::Deploy => "deploy",
            OrderKind::Advance => "advance",
            OrderKind::Bomb => "bomb",
            OrderKind::Blockade => "blockade",
            OrderKind::Airlift => "airlift",
            OrderKind::Negotiate => "negotiate",
        }
    }
}

/// A deferred action queued during issuance and applied during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Place armies from the reinforcement pool on an owned territory.
    Deploy {
        issuer: PlayerId,
        target: TerritoryId,
        armies: u32,
    },

    /// Move armies to an owned territory, or attack an enemy one.
    Advance {
        issuer: PlayerId,
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },

    /// Halve the armies on an enemy territory.
    Bomb {
        issuer: PlayerId,
        target: TerritoryId,
    },

    /// Double the armies on an owned territory and hand it to the neutral owner.
    Blockade {
        issuer: PlayerId,
        target: TerritoryId,
    },

    /// Move armies between two owned territories regardless of adjacency.
    Airlift {
        issuer: PlayerId,
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },

    /// Mutual truce with another player until the next issue-orders phase.
    Negotiate {
        issuer: PlayerId,
        target: PlayerId,
    },
}

impl Order {
    pub const fn kind(&self) -> OrderKind {
        match self {
            Order::Deploy { .. } => OrderKind::Deploy,
            Order::Advance { .. } => OrderKind::Advance,
            Order::Bomb { .. } => OrderKind::Bomb,
            Order::Blockade { .. } => OrderKind::Blockade,
            Order::Airlift { .. } => OrderKind::Airlift,
            Order::Negotiate { .. } => OrderKind::Negotiate,
        }
    }

    pub const fn issuer(&self) -> PlayerId {
        match *self {
            Order::Deploy { issuer, .. }
            | Order::Advance { issuer, .. }
            | Order::Bomb { issuer, .. }
            | Order::Blockade { issuer, .. }
            | Order::Airlift { issuer, .. }
            | Order::Negotiate { issuer, .. } => issuer,
        }
    }

    pub const fn is_deploy(&self) -> bool {
        matches!(self, Order::Deploy { .. })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Order::Deploy { issuer, target, armies } => {
                write!(f, "{issuer} deploy {armies} -> {target}")
            }
            Order::Advance { issuer, source, target, armies } => {
                write!(f, "{issuer} advance {armies} {source} -> {target}")
            }
            Order::Bomb { issuer, target } => write!(f, "{issuer} bomb {target}"),
            Order::Blockade { issuer, target } => write!(f, "{issuer} blockade {target}"),
            Order::Airlift { issuer, source, target, armies } => {
                write!(f, "{issuer} airlift {armies} {source} -> {target}")
            }
            Order::Negotiate { issuer, target } => write!(f, "{issuer} negotiate {target}"),
        }
    }
}

impl Loggable for Order {
    fn string_to_log(&self) -> String {
        format!("Order: {self}")
    }
}

/// A player's pending orders in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersList {
    orders: VecDeque<Order>,
}

impl OrdersList {
    pub fn new() -> Self {
        OrdersList::default()
    }

    /// Appends an order to the back of the list.
    pub fn add_order(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Removes and returns the front order.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Removes every deploy order, preserving the relative order of both the
    /// removed deploys and the orders left behind.
    pub fn take_deploys(&mut self) -> Vec<Order> {
        let (deploys, rest): (Vec<Order>, Vec<Order>) =
            self.orders.drain(..).partition(Order::is_deploy);
        self.orders = rest.into();
        deploys
    }

    /// Removes the order at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Order> {
        self.orders.remove(index)
    }

    /// Moves the order at `from` so it sits at `to`. Returns false when
    /// either index is out of range.
    pub fn move_order(&mut self, from: usize, to: usize) -> bool {
        if from >= self.orders.len() || to >= self.orders.len() {
            return false;
        }
        if let Some(order) = self.orders.remove(from) {
            self.orders.insert(to, order);
        }
        true
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Loggable for OrdersList {
    fn string_to_log(&self) -> String {
        let orders: Vec<String> = self.orders.iter().map(ToString::to_string).collect();
        format!("OrdersList [{}]", orders.join("; "))
    }
}
