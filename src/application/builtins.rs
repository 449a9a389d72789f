//! # Builtin Commands
//!
//! Commands implemented in code rather than stored text: `echo`, `commands`, `help`, `joke`.

use crate::application::registry::CommandRegistry;
use crate::strings::{logs, messages};

/// What an invocation wants sent back.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Silent,
    /// Sent with the message-type aware rule (whisper back to whispers).
    Respond(String),
    /// Always sent to the channel.
    Say(String),
    /// Deferred: the joke provider answers later.
    FetchJoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Commands,
    Help,
    Joke,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "echo" => Some(Builtin::Echo),
            "commands" => Some(Builtin::Commands),
            "help" => Some(Builtin::Help),
            "joke" => Some(Builtin::Joke),
            _ => None,
        }
    }

    pub fn run(self, registry: &CommandRegistry, prefix: char, params: &[String]) -> Reply {
        match self {
            Builtin::Echo => echo(params),
            Builtin::Commands => commands(registry, prefix),
            Builtin::Help => help(registry, prefix, params),
            Builtin::Joke => Reply::FetchJoke,
        }
    }
}

fn echo(params: &[String]) -> Reply {
    if params.is_empty() {
        tracing::debug!("{}", logs::NOTHING_TO_ECHO);
        return Reply::Silent;
    }
    Reply::Respond(params.join(" "))
}

fn commands(registry: &CommandRegistry, prefix: char) -> Reply {
    let list = registry
        .list_enabled()
        .iter()
        .map(|c| format!("{prefix}{}", c.name))
        .collect::<Vec<_>>()
        .join(" ");
    Reply::Respond(list)
}

fn help(registry: &CommandRegistry, prefix: char, params: &[String]) -> Reply {
    if params.is_empty() {
        return Reply::Respond(messages::HELP_USAGE.to_string());
    }
    let name = params.join(" ");
    match registry.find(&name) {
        Some(cmd) => Reply::Respond(messages::command_help(prefix, &cmd.name, &cmd.description)),
        None => Reply::Silent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Command;
    use crate::infrastructure::cache::FsCache;
    use std::sync::Arc;

    fn params(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_echo() {
        assert_eq!(echo(&params(&["hello", "world"])), Reply::Respond("hello world".into()));
        assert_eq!(echo(&[]), Reply::Silent);
    }

    #[test]
    fn test_commands_lists_enabled_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsCache::new(dir.path()));
        let mut registry = CommandRegistry::load(store).unwrap();
        registry
            .replace_all(vec![
                Command::text("a", "", "1"),
                Command::text("b", "", "2").disabled(),
                Command::builtin("commands", "list"),
            ])
            .unwrap();

        assert_eq!(
            Builtin::Commands.run(&registry, '!', &[]),
            Reply::Respond("!a !commands".into())
        );
    }

    #[test]
    fn test_help() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsCache::new(dir.path()));
        let registry = CommandRegistry::load(store).unwrap();

        assert_eq!(
            help(&registry, '!', &[]),
            Reply::Respond(messages::HELP_USAGE.into())
        );
        assert_eq!(
            help(&registry, '!', &params(&["echo"])),
            Reply::Respond("!echo - Print out everything after echo".into())
        );
        assert_eq!(help(&registry, '!', &params(&["nope"])), Reply::Silent);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Builtin::from_name("joke"), Some(Builtin::Joke));
        assert_eq!(Builtin::from_name("Joke"), None);
    }
}
