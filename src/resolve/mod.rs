//! Order resolution.
//!
//! Validates and executes orders, resolves combat, dispatches card plays and
//! runs the per-round bookkeeping around the execution pass.

pub mod cards;
pub mod combat;
pub mod execute;
pub mod phase;
pub mod round;
pub mod validate;

pub use cards::{card_order, play_card, CardPlay, CardTarget};
pub use combat::{combat_policy, CombatOutcome, CombatPolicy, ExpectedCombat, ProbabilisticCombat};
pub use execute::{execute, Effect};
pub use phase::{assign_reinforcements, reinforcements_for, reset_truces, winner};
pub use round::{execute_round, ExecutionReport, OrderOutcome};
pub use validate::{is_valid, projected_armies, validate, validate_issue};
