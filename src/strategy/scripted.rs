//! A strategy that replays fixed requests, round by round.

use std::collections::VecDeque;

use super::{OrderRequest, PlayerStrategy, PlayerView};

/// Issues a pre-written list of requests each round. Rounds past the end of
/// the script issue nothing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStrategy {
    rounds: VecDeque<Vec<OrderRequest>>,
    current: VecDeque<OrderRequest>,
}

impl ScriptedStrategy {
    pub fn new(rounds: impl IntoIterator<Item = Vec<OrderRequest>>) -> Self {
        ScriptedStrategy {
            rounds: rounds.into_iter().collect(),
            current: VecDeque::new(),
        }
    }

    /// A strategy that never issues anything.
    pub fn idle() -> Self {
        ScriptedStrategy::default()
    }
}

impl PlayerStrategy for ScriptedStrategy {
    fn begin_round(&mut self, _round: u32) {
        self.current = self.rounds.pop_front().unwrap_or_default().into();
    }

    fn next_order(&mut self, _view: &PlayerView<'_>) -> Option<OrderRequest> {
        self.current.pop_front()
    }
}
