//! Command recording and phase validation.

use std::collections::VecDeque;

use super::{Command, CommandKind};
use crate::engine::{PhaseMachine, Transition};
use crate::error::GameError;
use crate::log::{audit, Loggable};

/// Where a recorded command currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Pending,
    Validated,
    Rejected,
}

/// Records every command line it reads and validates them against a
/// `PhaseMachine`.
///
/// Commands start pending and move to the validated or rejected list exactly
/// once. Nothing is ever discarded.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    next_sequence: u64,
    pending: VecDeque<Command>,
    validated: Vec<Command>,
    rejected: Vec<Command>,
    exit_requested: bool,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        CommandProcessor {
            next_sequence: 1,
            pending: VecDeque::new(),
            validated: Vec::new(),
            rejected: Vec::new(),
            exit_requested: false,
        }
    }
}

impl CommandProcessor {
    pub fn new() -> Self {
        CommandProcessor::default()
    }

    /// Parses and records `raw`, returning its sequence number.
    pub fn read_command(&mut self, raw: &str) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let command = Command::parse(sequence, raw);
        tracing::debug!(sequence, raw = command.raw(), kind = ?command.kind(), "command read");
        self.pending.push_back(command);
        sequence
    }

    /// Looks up a recorded command in any list.
    pub fn command(&self, sequence: u64) -> Option<&Command> {
        self.pending
            .iter()
            .chain(&self.validated)
            .chain(&self.rejected)
            .find(|c| c.sequence() == sequence)
    }

    pub fn status(&self, sequence: u64) -> Option<CommandStatus> {
        if self.pending.iter().any(|c| c.sequence() == sequence) {
            Some(CommandStatus::Pending)
        } else if self.validated.iter().any(|c| c.sequence() == sequence) {
            Some(CommandStatus::Validated)
        } else if self.rejected.iter().any(|c| c.sequence() == sequence) {
            Some(CommandStatus::Rejected)
        } else {
            None
        }
    }

    /// Validates a pending command, driving `machine` for state-changing kinds.
    ///
    /// Returns `Ok(true)` when the command was accepted and `Ok(false)` when
    /// it was rejected; either way its effect string is set. Errors only when
    /// `sequence` is not pending.
    pub fn validate(&mut self, sequence: u64, machine: &mut PhaseMachine) -> Result<bool, GameError> {
        let mut command = self.take_pending(sequence)?;

        let verdict = match command.kind() {
            None => Err("unknown command".to_string()),
            Some(CommandKind::Quit) => {
                self.exit_requested = true;
                Ok("exit requested".to_string())
            }
            Some(CommandKind::Replay) => {
                if machine.change_state(Transition::Replay) {
                    Ok(format!("game restarted, phase is now {}", machine.phase()))
                } else {
                    Ok(format!("replay noted, phase remains {}", machine.phase()))
                }
            }
            Some(kind) => match kind.transition() {
                Some(t) if machine.change_state(t) => Ok(format!("phase is now {}", machine.phase())),
                _ => Err(format!("'{}' is not legal in phase {}", kind, machine.phase())),
            },
        };

        Ok(match verdict {
            Ok(effect) => {
                command.save_effect(effect);
                self.finish(command, CommandStatus::Validated);
                true
            }
            Err(reason) => {
                command.save_effect(reason);
                self.finish(command, CommandStatus::Rejected);
                false
            }
        })
    }

    /// Rejects a pending command without consulting the phase machine.
    pub fn reject(&mut self, sequence: u64, reason: impl Into<String>) -> Result<(), GameError> {
        let mut command = self.take_pending(sequence)?;
        command.save_effect(reason);
        self.finish(command, CommandStatus::Rejected);
        Ok(())
    }

    /// Appends detail to a validated command's effect.
    pub(crate) fn amend_effect(&mut self, sequence: u64, detail: &str) {
        if let Some(command) = self.validated.iter_mut().find(|c| c.sequence() == sequence) {
            let effect = match command.effect() {
                Some(existing) => format!("{existing}; {detail}"),
                None => detail.to_string(),
            };
            command.save_effect(effect);
        }
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn pending(&self) -> impl Iterator<Item = &Command> {
        self.pending.iter()
    }

    pub fn validated(&self) -> &[Command] {
        &self.validated
    }

    pub fn rejected(&self) -> &[Command] {
        &self.rejected
    }

    /// Every recorded command in sequence order.
    pub fn commands(&self) -> Vec<&Command> {
        let mut all: Vec<&Command> = self
            .pending
            .iter()
            .chain(&self.validated)
            .chain(&self.rejected)
            .collect();
        all.sort_by_key(|c| c.sequence());
        all
    }

    fn take_pending(&mut self, sequence: u64) -> Result<Command, GameError> {
        let idx = self
            .pending
            .iter()
            .position(|c| c.sequence() == sequence)
            .ok_or_else(|| GameError::InvalidCommand(format!("no pending command #{sequence}")))?;
        self.pending
            .remove(idx)
            .ok_or_else(|| GameError::InvalidCommand(format!("no pending command #{sequence}")))
    }

    fn finish(&mut self, command: Command, status: CommandStatus) {
        match status {
            CommandStatus::Validated => tracing::info!(sequence = command.sequence(), effect = command.effect(), "command accepted"),
            _ => tracing::warn!(sequence = command.sequence(), effect = command.effect(), "command rejected"),
        }
        audit(&command);
        match status {
            CommandStatus::Rejected => self.rejected.push(command),
            _ => self.validated.push(command),
        }
    }
}

impl Loggable for CommandProcessor {
    fn string_to_log(&self) -> String {
        format!(
            "CommandProcessor: {} pending, {} validated, {} rejected{}",
            self.pending.len(),
            self.validated.len(),
            self.rejected.len(),
            if self.exit_requested { ", exit requested" } else { "" }
        )
    }
}
