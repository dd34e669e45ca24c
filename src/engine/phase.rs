//! Game phase state machine.
//!
//! The transition table is a function of (phase, transition) to the next
//! phase. Pairs missing from the table are rejected and leave the phase as it
//! was.
//!
//! Phase flow:
//! - Start               --loadmap-->        MapLoaded
//! - MapLoaded           --loadmap-->        MapLoaded
//! - MapLoaded           --validatemap-->    MapValidated
//! - MapValidated        --addplayer-->      PlayersAdded
//! - PlayersAdded        --addplayer-->      PlayersAdded
//! - PlayersAdded        --gamestart-->      AssignReinforcement
//! - AssignReinforcement --issueorders-->    IssueOrders
//! - IssueOrders         --endissueorders--> ExecuteOrders
//! - ExecuteOrders       --endexecorders-->  AssignReinforcement
//! - ExecuteOrders       --win-->            Win
//! - Win                 --replay-->         Start

use std::fmt;

/// The global stage of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Start,
    MapLoaded,
    MapValidated,
    PlayersAdded,
    AssignReinforcement,
    IssueOrders,
    ExecuteOrders,
    Win,
}

pub const ALL_PHASES: [GamePhase; 8] = [
    GamePhase::Start,
    GamePhase::MapLoaded,
    GamePhase::MapValidated,
    GamePhase::PlayersAdded,
    GamePhase::AssignReinforcement,
    GamePhase::IssueOrders,
    GamePhase::ExecuteOrders,
    GamePhase::Win,
];

impl GamePhase {
    pub const fn name(self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::MapLoaded => "maploaded",
            GamePhase::MapValidated => "mapvalidated",
            GamePhase::PlayersAdded => "playersadded",
            GamePhase::AssignReinforcement => "assignreinforcement",
            GamePhase::IssueOrders => "issueorders",
            GamePhase::ExecuteOrders => "executeorders",
            GamePhase::Win => "win",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that can move the phase: the startup commands plus the
/// engine's own round events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    LoadMap,
    ValidateMap,
    AddPlayer,
    GameStart,
    IssueOrders,
    EndIssueOrders,
    EndExecOrders,
    Win,
    Replay,
}

pub const ALL_TRANSITIONS: [Transition; 9] = [
    Transition::LoadMap,
    Transition::ValidateMap,
    Transition::AddPlayer,
    Transition::GameStart,
    Transition::IssueOrders,
    Transition::EndIssueOrders,
    Transition::EndExecOrders,
    Transition::Win,
    Transition::Replay,
];

impl Transition {
    pub const fn name(self) -> &'static str {
        match self {
            Transition::LoadMap => "loadmap",
            Transition::ValidateMap => "validatemap",
            Transition::AddPlayer => "addplayer",
            Transition::GameStart => "gamestart",
            Transition::IssueOrders => "issueorders",
            Transition::EndIssueOrders => "endissueorders",
            Transition::EndExecOrders => "endexecorders",
            Transition::Win => "win",
            Transition::Replay => "replay",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up the transition table.
pub const fn next_phase(phase: GamePhase, transition: Transition) -> Option<GamePhase> {
    use GamePhase as P;
    use Transition as T;
    match (phase, transition) {
        (P::Start, T::LoadMap) | (P::MapLoaded, T::LoadMap) => Some(P::MapLoaded),
        (P::MapLoaded, T::ValidateMap) => Some(P::MapValidated),
        (P::MapValidated, T::AddPlayer) | (P::PlayersAdded, T::AddPlayer) => Some(P::PlayersAdded),
        (P::PlayersAdded, T::GameStart) => Some(P::AssignReinforcement),
        (P::AssignReinforcement, T::IssueOrders) => Some(P::IssueOrders),
        (P::IssueOrders, T::EndIssueOrders) => Some(P::ExecuteOrders),
        (P::ExecuteOrders, T::EndExecOrders) => Some(P::AssignReinforcement),
        (P::ExecuteOrders, T::Win) => Some(P::Win),
        (P::Win, T::Replay) => Some(P::Start),
        _ => None,
    }
}

/// Holds the current phase. The only mutation is `change_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: GamePhase,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        PhaseMachine {
            phase: GamePhase::Start,
        }
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        PhaseMachine::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether `transition` is legal from the current phase.
    pub fn can_change(&self, transition: Transition) -> bool {
        next_phase(self.phase, transition).is_some()
    }

    /// Applies `transition` if the table allows it. Returns false and leaves
    /// the phase untouched otherwise.
    pub fn change_state(&mut self, transition: Transition) -> bool {
        match next_phase(self.phase, transition) {
            Some(next) => {
                tracing::info!(from = %self.phase, to = %next, via = %transition, "phase change");
                self.phase = next;
                true
            }
            None => {
                tracing::debug!(phase = %self.phase, via = %transition, "transition rejected");
                false
            }
        }
    }
}
