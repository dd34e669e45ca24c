//! Startup commands.
//!
//! Parses raw command lines into `Command` records and validates them against
//! the phase state machine. Every line becomes a record, gibberish included;
//! rejected commands stay recorded with the reason as their effect.

pub mod processor;

use std::fmt;

use crate::engine::Transition;
use crate::log::Loggable;

pub use processor::CommandProcessor;

/// The legal command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    LoadMap,
    ValidateMap,
    AddPlayer,
    GameStart,
    Replay,
    Quit,
}

/// Every command kind, in the order the console lists them.
pub const ALL_COMMAND_KINDS: [CommandKind; 6] = [
    CommandKind::LoadMap,
    CommandKind::ValidateMap,
    CommandKind::AddPlayer,
    CommandKind::GameStart,
    CommandKind::Replay,
    CommandKind::Quit,
];

impl CommandKind {
    pub const fn token(self) -> &'static str {
        match self {
            CommandKind::LoadMap => "loadmap",
            CommandKind::ValidateMap => "validatemap",
            CommandKind::AddPlayer => "addplayer",
            CommandKind::GameStart => "gamestart",
            CommandKind::Replay => "replay",
            CommandKind::Quit => "quit",
        }
    }

    pub fn from_token(token: &str) -> Option<CommandKind> {
        ALL_COMMAND_KINDS.into_iter().find(|k| k.token() == token)
    }

    /// The phase transition this command drives, if any.
    pub const fn transition(self) -> Option<Transition> {
        match self {
            CommandKind::LoadMap => Some(Transition::LoadMap),
            CommandKind::ValidateMap => Some(Transition::ValidateMap),
            CommandKind::AddPlayer => Some(Transition::AddPlayer),
            CommandKind::GameStart => Some(Transition::GameStart),
            CommandKind::Replay => Some(Transition::Replay),
            CommandKind::Quit => None,
        }
    }

    /// Context-free commands are valid in every phase.
    pub const fn is_context_free(self) -> bool {
        matches!(self, CommandKind::Replay | CommandKind::Quit)
    }

    /// Whether the command needs an argument (map name, player name).
    pub const fn takes_argument(self) -> bool {
        matches!(self, CommandKind::LoadMap | CommandKind::AddPlayer)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One recorded command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    sequence: u64,
    raw: String,
    kind: Option<CommandKind>,
    argument: Option<String>,
    effect: Option<String>,
}

impl Command {
    /// Parses `<kind> [argument]`. Unknown kinds produce a command with no kind.
    pub fn parse(sequence: u64, raw: &str) -> Self {
        let trimmed = raw.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        Command {
            sequence,
            raw: trimmed.to_string(),
            kind: CommandKind::from_token(head),
            argument: (!rest.is_empty()).then(|| rest.to_string()),
            effect: None,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> Option<CommandKind> {
        self.kind
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The effect description, set once the command has been processed.
    pub fn effect(&self) -> Option<&str> {
        self.effect.as_deref()
    }

    pub(crate) fn save_effect(&mut self, effect: impl Into<String>) {
        self.effect = Some(effect.into());
    }
}

impl Loggable for Command {
    fn string_to_log(&self) -> String {
        format!(
            "Command #{} '{}': {}",
            self.sequence,
            self.raw,
            self.effect.as_deref().unwrap_or("pending")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_and_argument() {
        let cmd = Command::parse(1, "  addplayer   Ada Lovelace ");
        assert_eq!(cmd.kind(), Some(CommandKind::AddPlayer));
        assert_eq!(cmd.argument(), Some("Ada Lovelace"));
        assert_eq!(cmd.raw(), "addplayer   Ada Lovelace");
        assert_eq!(cmd.effect(), None);
    }

    #[test]
    fn gibberish_has_no_kind() {
        let cmd = Command::parse(4, "launch missiles");
        assert_eq!(cmd.kind(), None);
        assert_eq!(cmd.sequence(), 4);
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert_eq!(CommandKind::from_token("LoadMap"), None);
        for kind in ALL_COMMAND_KINDS {
            assert_eq!(CommandKind::from_token(kind.token()), Some(kind));
        }
    }

    #[test]
    fn quit_has_no_transition() {
        assert_eq!(CommandKind::Quit.transition(), None);
        assert!(CommandKind::Quit.is_context_free());
        assert!(!CommandKind::LoadMap.is_context_free());
    }

    #[test]
    fn log_line_includes_effect() {
        let mut cmd = Command::parse(2, "validatemap");
        assert_eq!(cmd.string_to_log(), "Command #2 'validatemap': pending");
        cmd.save_effect("phase is now MapValidated");
        assert_eq!(cmd.string_to_log(), "Command #2 'validatemap': phase is now MapValidated");
    }
}
