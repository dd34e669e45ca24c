//! The execution pass.
//!
//! Orders run in two tiers. First every player's deploy orders, in roster
//! order, so fresh armies are on the board before anything moves. Then every
//! remaining order, player by player in roster order and front to back
//! within each player's list. Each order is re-validated just before it runs;
//! a stale order is skipped and recorded, never partially applied. Armies
//! committed to deploys that were skipped go back to their owner's pool.

use super::combat::CombatPolicy;
use super::execute::{execute, Effect};
use crate::board::{GameState, Order};
use crate::error::OrderError;
use crate::log::{audit, Loggable};

/// One order and what became of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOutcome {
    pub order: Order,
    pub result: Result<Effect, OrderError>,
}

impl OrderOutcome {
    pub fn is_executed(&self) -> bool {
        self.result.is_ok()
    }
}

impl Loggable for OrderOutcome {
    fn string_to_log(&self) -> String {
        match &self.result {
            Ok(effect) => format!("Order executed: {} => {}", self.order, effect),
            Err(e) => format!("Order skipped: {} => {}", self.order, e),
        }
    }
}

/// Every outcome of one execution pass, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcomes: Vec<OrderOutcome>,
}

impl ExecutionReport {
    pub fn executed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_executed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.executed()
    }
}

/// Drains every player's orders list and applies the orders.
pub fn execute_round(state: &mut GameState, combat: &mut dyn CombatPolicy) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for p in state.players.iter().filter(|p| !p.orders.is_empty()) {
        audit(&p.orders);
    }

    for idx in 0..state.players.len() {
        let deploys = state.players[idx].orders.take_deploys();
        for order in deploys {
            run(order, state, combat, &mut report);
        }
    }

    for idx in 0..state.players.len() {
        while let Some(order) = state.players[idx].orders.pop_front() {
            run(order, state, combat, &mut report);
        }
    }

    for p in state.players.iter_mut() {
        p.release_committed();
    }

    report
}

fn run(order: Order, state: &mut GameState, combat: &mut dyn CombatPolicy, report: &mut ExecutionReport) {
    let result = execute(&order, state, combat);
    let outcome = OrderOutcome { order, result };
    match &outcome.result {
        Ok(effect) => tracing::debug!(%order, %effect, "order executed"),
        Err(e) => tracing::warn!(%order, reason = %e, "order skipped"),
    }
    audit(&outcome);
    report.outcomes.push(outcome);
}
