//! # Command Router
//!
//! Decides what to do with each transport event. The router is pure decision
//! logic over `RouterState`: it returns `Action`s and leaves executing them to
//! the dispatcher.

use anyhow::{Context, Result};
use std::path::Path;

use crate::application::builtins::Reply;
use crate::application::resolver::{self, Resolution};
use crate::application::state::RouterState;
use crate::domain::config::Configuration;
use crate::domain::types::{Action, Command, CommandSet, MessageContext, MessageType, TransportEvent};
use crate::strings::{logs, messages};

pub struct CommandRouter {
    pub state: RouterState,
}

impl CommandRouter {
    pub fn new(state: RouterState) -> Self {
        Self { state }
    }

    pub fn handle_event(&mut self, event: TransportEvent) -> Vec<Action> {
        match event {
            TransportEvent::Message {
                target,
                context,
                text,
                is_self,
            } => {
                // Ignore messages from the bot
                if is_self {
                    return Vec::new();
                }
                self.route_message(&target, &context, &text)
            }
            TransportEvent::Join {
                channel,
                username,
                is_self,
            } => self.greet(&channel, &username, is_self),
            TransportEvent::Hosted {
                channel,
                username,
                viewers,
                autohost,
            } => {
                tracing::info!("Hosted by {} (viewers={}, autohost={})", username, viewers, autohost);
                vec![Action::Say {
                    text: messages::hosted(&channel, &username, viewers),
                    target: channel,
                }]
            }
            TransportEvent::Connected { addr, port } => {
                let state = &mut self.state;
                state.policy.on_connected(&mut state.session, &addr, port);
                Vec::new()
            }
            TransportEvent::Disconnected { reason } => {
                let state = &mut self.state;
                state.policy.on_disconnected(&mut state.session, &reason)
            }
        }
    }

    fn route_message(&self, target: &str, context: &MessageContext, text: &str) -> Vec<Action> {
        let state = &self.state;
        let resolution = resolver::resolve(
            &state.registry,
            text,
            state.prefix,
            &context.username,
            state.privileged(),
        );

        match resolution {
            Resolution::Plain => {
                tracing::info!(
                    "{}",
                    logs::plain_message(target, context.message_type.as_str(), &context.username, text)
                );
                vec![Action::Notify {
                    title: messages::message_from(&context.username),
                    body: text.to_string(),
                }]
            }
            Resolution::Unknown { name } => {
                tracing::info!("{}", logs::unknown_command(&name, &context.username));
                Vec::new()
            }
            Resolution::Disabled { name, notice } => {
                tracing::info!("{}", logs::disabled_command(&name, &context.username));
                vec![Action::Say {
                    target: target.to_string(),
                    text: notice,
                }]
            }
            Resolution::Resolved { name, reply } => {
                tracing::info!("{}", logs::executed_command(&name, &context.username));
                match reply {
                    Reply::Silent => Vec::new(),
                    Reply::Respond(text) => vec![send_message(target, context, text)],
                    Reply::Say(text) => vec![Action::Say {
                        target: target.to_string(),
                        text,
                    }],
                    Reply::FetchJoke => vec![Action::FetchJoke {
                        target: target.to_string(),
                        context: context.clone(),
                    }],
                }
            }
            Resolution::Failed { name, error } => {
                tracing::error!("Command {} failed for {}: {:#}", name, context.username, error);
                vec![Action::Notify {
                    title: messages::command_failed_title(state.prefix, &name),
                    body: format!("{error:#}"),
                }]
            }
        }
    }

    fn greet(&mut self, channel: &str, username: &str, is_self: bool) -> Vec<Action> {
        tracing::debug!("join({}, {}, {})", channel, username, is_self);
        let config = &self.state.config;
        if is_self
            || username.eq_ignore_ascii_case(&config.bot_username)
            || username.eq_ignore_ascii_case(config.owner())
        {
            return Vec::new();
        }
        if self.state.session.was_greeted(username) {
            return Vec::new();
        }
        self.state.session.greet(username);
        vec![Action::Say {
            target: channel.to_string(),
            text: messages::welcome(self.state.prefix, username),
        }]
    }

    /// Completion of a deferred `joke` invocation.
    pub fn joke_ready(&self, target: &str, context: &MessageContext, joke: String) -> Vec<Action> {
        vec![send_message(target, context, joke)]
    }

    // Control surface operations

    /// Upserts `cmd` and clears the editor selection.
    pub fn add_or_update_command(&mut self, cmd: Command) -> Result<Command> {
        let merged = self.state.registry.upsert(cmd)?;
        self.state.selected = None;
        Ok(merged)
    }

    pub fn select_command(&mut self, name: &str) -> Option<&Command> {
        let cmd = self.state.registry.find(name)?;
        self.state.selected = Some(cmd.name.clone());
        Some(cmd)
    }

    pub fn export_commands(&self, path: &Path) -> Result<()> {
        let doc = CommandSet {
            commands: self.state.registry.commands().to_vec(),
        };
        self.state.store.write_all(path, &doc)
    }

    /// Replaces the registry with the commands in `path`. Returns how many were kept.
    pub fn import_commands(&mut self, path: &Path) -> Result<usize> {
        let doc = self.state.store.read_all(path)?;
        self.state.registry.replace_all(doc.commands)?;
        Ok(self.state.registry.commands().len())
    }

    /// Persists `config` as the active secret and reloads it.
    pub fn replace_configuration(&mut self, config: Configuration) -> Result<()> {
        let store = self.state.store.clone();
        let mut secrets = store.secrets()?;
        secrets.config = Some(config);
        store.save_secret(&secrets)?;

        let reloaded = store
            .secrets()?
            .config
            .context("Secrets store lost the configuration")?;
        self.state.set_config(reloaded);
        Ok(())
    }
}

/// Whispers go back as whispers, everything else to the channel.
fn send_message(target: &str, context: &MessageContext, text: String) -> Action {
    match context.message_type {
        MessageType::Whisper => Action::Whisper {
            target: target.to_string(),
            text,
        },
        _ => Action::Say {
            target: target.to_string(),
            text,
        },
    }
}
