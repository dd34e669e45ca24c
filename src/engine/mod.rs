//! Game orchestration.
//!
//! `GameEngine` owns the phase machine, the command processor, the map
//! registry and the live `GameState`. Startup goes through text commands
//! (`process_command`); once the game has started the engine drives rounds
//! itself: reinforcement, issuance from player strategies, the execution
//! pass and the win check.

pub mod phase;
pub mod setup;

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{GameState, Map, Order, PlayerId};
use crate::command::{Command, CommandKind, CommandProcessor};
use crate::config::GameConfig;
use crate::error::{GameError, OrderError};
use crate::log::{audit, Loggable};
use crate::resolve::{
    assign_reinforcements, combat_policy, execute_round, play_card, reset_truces, validate_issue,
    winner, CardPlay, CombatPolicy, ExecutionReport,
};
use crate::strategy::{OrderRequest, PlayerStrategy, PlayerView};

pub use phase::{next_phase, GamePhase, PhaseMachine, Transition, ALL_PHASES, ALL_TRANSITIONS};

/// Most players a game accepts.
pub const MAX_PLAYERS: usize = 6;
/// Fewest players `gamestart` accepts.
pub const MIN_PLAYERS: usize = 2;
/// Requests a single player may make in one issuance round.
const MAX_REQUESTS_PER_ROUND: usize = 64;

/// What the issuance round produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueReport {
    pub queued: usize,
    pub reinforced: usize,
    pub refused: usize,
}

/// Everything that happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub reinforcements: Vec<(PlayerId, u32)>,
    pub issued: IssueReport,
    pub execution: ExecutionReport,
    pub eliminated: Vec<PlayerId>,
}

pub struct GameEngine {
    config: GameConfig,
    maps: BTreeMap<String, Map>,
    state: Option<GameState>,
    machine: PhaseMachine,
    processor: CommandProcessor,
    rng: SmallRng,
    combat: Box<dyn CombatPolicy + Send>,
    round: u32,
    winner: Option<PlayerId>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        let rng = if config.seed != 0 {
            SmallRng::seed_from_u64(config.seed)
        } else {
            SmallRng::from_entropy()
        };
        let combat = combat_policy(&config.combat, config.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        GameEngine {
            config,
            maps: BTreeMap::new(),
            state: None,
            machine: PhaseMachine::new(),
            processor: CommandProcessor::new(),
            rng,
            combat,
            round: 0,
            winner: None,
        }
    }

    /// Replaces the combat policy, e.g. with a deterministic one for tests.
    pub fn with_combat(mut self, combat: Box<dyn CombatPolicy + Send>) -> Self {
        self.combat = combat;
        self
    }

    /// Makes `map` loadable by name. A map with the same name is replaced.
    pub fn register_map(&mut self, map: Map) {
        tracing::debug!(name = %map.name, territories = map.len(), "map registered");
        self.maps.insert(map.name.clone(), map);
    }

    pub fn map_names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    pub fn exit_requested(&self) -> bool {
        self.processor.exit_requested()
    }

    /// Rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The winner once the game is over; `None` during play or after a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Records and applies one command line, returning the recorded command.
    ///
    /// Rejections are not errors: the returned command carries the reason
    /// as its effect and the phase is unchanged.
    pub fn process_command(&mut self, line: &str) -> Result<Command, GameError> {
        let sequence = self.processor.read_command(line);
        let (kind, argument) = match self.processor.command(sequence) {
            Some(c) => (c.kind(), c.argument().map(str::to_string)),
            None => (None, None),
        };

        match kind {
            Some(kind) if !kind.is_context_free() => {
                let legal = kind.transition().is_some_and(|t| self.machine.can_change(t));
                if !legal {
                    self.processor.validate(sequence, &mut self.machine)?;
                } else {
                    match self.apply_setup(kind, argument.as_deref()) {
                        Ok(detail) => {
                            if self.processor.validate(sequence, &mut self.machine)? {
                                self.processor.amend_effect(sequence, &detail);
                            }
                        }
                        Err(reason) => self.processor.reject(sequence, reason.to_string())?,
                    }
                }
            }
            Some(CommandKind::Replay) => {
                let was_over = self.machine.phase() == GamePhase::Win;
                self.processor.validate(sequence, &mut self.machine)?;
                if was_over && self.machine.phase() == GamePhase::Start {
                    self.reset();
                }
            }
            _ => {
                self.processor.validate(sequence, &mut self.machine)?;
            }
        }

        self.processor
            .command(sequence)
            .cloned()
            .ok_or_else(|| GameError::InvalidCommand(format!("command #{sequence} was lost")))
    }

    /// Checks and performs the side effect of a startup command. Runs only
    /// when the phase transition is legal, and before it is taken.
    fn apply_setup(&mut self, kind: CommandKind, argument: Option<&str>) -> Result<String, GameError> {
        match kind {
            CommandKind::LoadMap => {
                let name = argument.ok_or_else(|| GameError::InvalidCommand("loadmap needs a map name".into()))?;
                let map = self
                    .maps
                    .get(name)
                    .cloned()
                    .ok_or_else(|| GameError::MapNotFound(name.to_string()))?;
                let detail = format!("loaded map '{}' ({} territories)", map.name, map.len());
                self.state = Some(GameState::new(map));
                Ok(detail)
            }
            CommandKind::ValidateMap => {
                let state = self.loaded_state()?;
                state.map.validate()?;
                Ok(format!("map '{}' is valid", state.map.name))
            }
            CommandKind::AddPlayer => {
                let name = argument
                    .ok_or_else(|| GameError::InvalidCommand("addplayer needs a player name".into()))?
                    .to_string();
                let state = self.loaded_state_mut()?;
                if state.players.len() >= MAX_PLAYERS {
                    return Err(GameError::InvalidCommand(format!(
                        "at most {MAX_PLAYERS} players can join"
                    )));
                }
                if state.players.iter().any(|p| p.name == name) {
                    return Err(GameError::InvalidCommand(format!("player '{name}' already joined")));
                }
                let id = state.add_player(name.clone());
                Ok(format!("added player {name} as {id}"))
            }
            CommandKind::GameStart => {
                let count = self.loaded_state()?.players.len();
                if count < MIN_PLAYERS {
                    return Err(GameError::InvalidCommand(format!(
                        "gamestart needs at least {MIN_PLAYERS} players, have {count}"
                    )));
                }
                let state = self.state.as_mut().ok_or_else(no_map)?;
                setup::start_game(state, &self.config, &mut self.rng)?;
                Ok(format!("game started with {count} players"))
            }
            CommandKind::Replay | CommandKind::Quit => Ok(String::new()),
        }
    }

    fn loaded_state(&self) -> Result<&GameState, GameError> {
        self.state.as_ref().ok_or_else(no_map)
    }

    fn loaded_state_mut(&mut self) -> Result<&mut GameState, GameError> {
        self.state.as_mut().ok_or_else(no_map)
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.machine.phase() == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected: expected.name(),
                actual: self.machine.phase().name(),
            })
        }
    }

    fn reset(&mut self) {
        tracing::info!("game reset");
        self.state = None;
        self.round = 0;
        self.winner = None;
    }

    /// Grants reinforcements and opens the issue-orders phase, clearing
    /// every truce from the previous round.
    pub fn start_round(&mut self) -> Result<Vec<(PlayerId, u32)>, GameError> {
        self.expect_phase(GamePhase::AssignReinforcement)?;
        let config = &self.config;
        let state = self.state.as_mut().ok_or_else(no_map)?;
        let grants = assign_reinforcements(state, config);
        self.round += 1;
        for (player, armies) in &grants {
            tracing::debug!(round = self.round, player = %player, armies, "reinforcements");
        }
        self.machine.change_state(Transition::IssueOrders);
        reset_truces(state);
        Ok(grants)
    }

    /// Turns one strategy request into a queued order (or an immediate
    /// reinforcement). Only legal during the issue-orders phase.
    pub fn issue(&mut self, player: PlayerId, request: OrderRequest) -> Result<Option<CardPlay>, GameError> {
        self.expect_phase(GamePhase::IssueOrders)?;
        let reinforcement_armies = self.config.reinforcement_card_armies;
        let state = self.state.as_mut().ok_or_else(no_map)?;
        if state.player(player)?.is_eliminated() {
            return Err(OrderError::Eliminated(player).into());
        }

        let order = match request {
            OrderRequest::Deploy { target, armies } => Order::Deploy { issuer: player, target, armies },
            OrderRequest::Advance { source, target, armies } => Order::Advance {
                issuer: player,
                source,
                target,
                armies,
            },
            OrderRequest::PlayCard { hand_index, target } => {
                return play_card(state, player, hand_index, target, reinforcement_armies).map(Some);
            }
        };

        validate_issue(&order, state)?;
        let p = state.player_mut(player)?;
        if let Order::Deploy { armies, .. } = order {
            p.commit_reinforcements(armies)?;
        }
        p.orders.add_order(order);
        audit(&order);
        Ok(None)
    }

    /// Asks each active player's strategy for requests, one per player per
    /// pass, until every strategy is done. Ends the issue-orders phase.
    pub fn issue_orders(&mut self, strategies: &mut [Box<dyn PlayerStrategy>]) -> Result<IssueReport, GameError> {
        self.expect_phase(GamePhase::IssueOrders)?;
        let players: Vec<PlayerId> = self.loaded_state()?.players.iter().map(|p| p.id).collect();
        if strategies.len() != players.len() {
            return Err(GameError::StrategyCount {
                expected: players.len(),
                actual: strategies.len(),
            });
        }

        let state = self.loaded_state()?;
        let mut active: Vec<PlayerId> = players
            .into_iter()
            .filter(|&p| !state.players[p.0].is_eliminated())
            .collect();
        for &p in &active {
            strategies[p.0].begin_round(self.round);
        }

        let mut report = IssueReport::default();
        let mut requests = vec![0usize; strategies.len()];
        while !active.is_empty() {
            let mut still_issuing = Vec::with_capacity(active.len());
            for player in active {
                let request = {
                    let view = PlayerView::new(player, self.loaded_state()?);
                    strategies[player.0].next_order(&view)
                };
                let Some(request) = request else { continue };
                requests[player.0] += 1;

                match self.issue(player, request) {
                    Ok(Some(CardPlay::Reinforced { .. })) => report.reinforced += 1,
                    Ok(_) => report.queued += 1,
                    Err(e) => {
                        tracing::debug!(player = %player, ?request, reason = %e, "request refused");
                        report.refused += 1;
                    }
                }
                if requests[player.0] < MAX_REQUESTS_PER_ROUND {
                    still_issuing.push(player);
                } else {
                    tracing::warn!(player = %player, "request limit reached");
                }
            }
            active = still_issuing;
        }

        self.machine.change_state(Transition::EndIssueOrders);
        Ok(report)
    }

    /// Runs the execution pass, then either ends the game or returns to
    /// reinforcement.
    pub fn execute_orders(&mut self) -> Result<(ExecutionReport, Vec<PlayerId>), GameError> {
        self.expect_phase(GamePhase::ExecuteOrders)?;
        let state = self.state.as_mut().ok_or_else(no_map)?;
        let before = state.active_players();
        let report = execute_round(state, self.combat.as_mut());
        let after = state.active_players();
        let eliminated: Vec<PlayerId> = before.into_iter().filter(|p| !after.contains(p)).collect();
        for p in &eliminated {
            tracing::info!(player = %p, round = self.round, "player eliminated");
        }

        if let Some(w) = winner(state) {
            tracing::info!(winner = %w, name = %state.players[w.0].name, round = self.round, "game won");
            self.winner = Some(w);
            self.machine.change_state(Transition::Win);
        } else if self.round >= self.config.max_rounds {
            tracing::info!(round = self.round, "round limit reached, game drawn");
            self.machine.change_state(Transition::Win);
        } else {
            self.machine.change_state(Transition::EndExecOrders);
        }
        Ok((report, eliminated))
    }

    /// Plays one full round.
    pub fn play_round(&mut self, strategies: &mut [Box<dyn PlayerStrategy>]) -> Result<RoundSummary, GameError> {
        let reinforcements = self.start_round()?;
        let issued = self.issue_orders(strategies)?;
        let (execution, eliminated) = self.execute_orders()?;
        Ok(RoundSummary {
            round: self.round,
            reinforcements,
            issued,
            execution,
            eliminated,
        })
    }

    /// Plays rounds until the game reaches `Win`. Returns the winner, or
    /// `None` for a draw.
    pub fn play_to_end(&mut self, strategies: &mut [Box<dyn PlayerStrategy>]) -> Result<Option<PlayerId>, GameError> {
        while self.machine.phase() != GamePhase::Win {
            self.play_round(strategies)?;
        }
        Ok(self.winner)
    }
}

fn no_map() -> GameError {
    GameError::InvalidCommand("no map loaded".into())
}

impl Loggable for GameEngine {
    fn string_to_log(&self) -> String {
        let players = self
            .state
            .as_ref()
            .map(|s| {
                s.players
                    .iter()
                    .map(|p| format!("{}={}", p.name, p.territory_count()))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        format!(
            "GameEngine: phase {}, round {}, players [{}]",
            self.machine.phase(),
            self.round,
            players
        )
    }
}
