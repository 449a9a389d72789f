//! # Command Resolver
//!
//! Turns raw message text into a `Resolution`: a plain message, an unknown or
//! disabled command, the reply a command produced, or the error it failed with.

use anyhow::Context;

use crate::application::builtins::{Builtin, Reply};
use crate::application::registry::CommandRegistry;
use crate::domain::types::CommandKind;
use crate::strings::messages;

/// A message that addresses a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Debug)]
pub enum Resolution {
    Plain,
    Unknown { name: String },
    Disabled { name: String, notice: String },
    Resolved { name: String, reply: Reply },
    Failed { name: String, error: anyhow::Error },
}

/// Splits `text` into a command name and parameters.
/// Returns `None` for plain messages: no prefix, and not from the privileged account.
pub fn parse(text: &str, prefix: char, sender: &str, privileged: &str) -> Option<Invocation> {
    let body = match text.strip_prefix(prefix) {
        Some(rest) => rest,
        None if !privileged.is_empty() && sender.eq_ignore_ascii_case(privileged) => text,
        None => return None,
    };

    let mut words = body.split_whitespace().map(str::to_string);
    let name = words.next().unwrap_or_default();
    Some(Invocation {
        name,
        params: words.collect(),
    })
}

pub fn resolve(
    registry: &CommandRegistry,
    text: &str,
    prefix: char,
    sender: &str,
    privileged: &str,
) -> Resolution {
    let Some(Invocation { name, params }) = parse(text, prefix, sender, privileged) else {
        return Resolution::Plain;
    };

    let Some(cmd) = registry.find(&name) else {
        return Resolution::Unknown { name };
    };

    if !cmd.enabled {
        let notice = messages::command_disabled(&name);
        return Resolution::Disabled { name, notice };
    }

    match &cmd.kind {
        CommandKind::Builtin => match Builtin::from_name(&name) {
            Some(builtin) => Resolution::Resolved {
                reply: builtin.run(registry, prefix, &params),
                name,
            },
            None => Resolution::Failed {
                error: anyhow::anyhow!("No builtin handler named '{name}'"),
                name,
            },
        },
        CommandKind::Text { value } => Resolution::Resolved {
            reply: Reply::Respond(value.clone()),
            name,
        },
        CommandKind::File { path } => {
            match std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
            {
                Ok(contents) => Resolution::Resolved {
                    reply: Reply::Say(contents),
                    name,
                },
                Err(error) => Resolution::Failed { name, error },
            }
        }
    }
}
