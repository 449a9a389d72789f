//! # Domain Types
//!
//! Common data structures and enums used across the application logic:
//! command records, transport events, and the actions the router asks for.

use crate::domain::config::Configuration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named, enable-gated chat command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: CommandKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Command {
    pub fn builtin(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: CommandKind::Builtin,
            enabled: true,
        }
    }

    pub fn text(name: &str, description: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: CommandKind::Text {
                value: value.to_string(),
            },
            enabled: true,
        }
    }

    pub fn file(name: &str, description: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: CommandKind::File { path: path.into() },
            enabled: true,
        }
    }

    #[cfg(test)]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, CommandKind::Builtin)
    }
}

/// What a command produces when invoked. Serialized under a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandKind {
    #[serde(rename = "builtin")]
    Builtin,
    #[serde(rename = "string")]
    Text { value: String },
    /// Contents are read from `path` on every invocation.
    #[serde(rename = "file")]
    File {
        #[serde(rename = "value")]
        path: PathBuf,
    },
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Builtin => "builtin",
            CommandKind::Text { .. } => "string",
            CommandKind::File { .. } => "file",
        }
    }
}

/// Import/export document: a mapping with a `commands` key.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSet {
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// Contents of the secrets store.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub config: Option<Configuration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Chat,
    Action,
    Whisper,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Chat => "chat",
            MessageType::Action => "action",
            MessageType::Whisper => "whisper",
        }
    }
}

/// Per-message metadata supplied by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageContext {
    pub username: String,
    pub message_type: MessageType,
}

impl MessageContext {
    pub fn chat(username: &str) -> Self {
        Self {
            username: username.to_string(),
            message_type: MessageType::Chat,
        }
    }

    pub fn whisper(username: &str) -> Self {
        Self {
            username: username.to_string(),
            message_type: MessageType::Whisper,
        }
    }
}

/// Events raised by a chat transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Message {
        target: String,
        context: MessageContext,
        text: String,
        is_self: bool,
    },
    Join {
        channel: String,
        username: String,
        is_self: bool,
    },
    Hosted {
        channel: String,
        username: String,
        viewers: u32,
        autohost: bool,
    },
    Connected {
        addr: String,
        port: u16,
    },
    Disconnected {
        reason: String,
    },
}

/// Side effects requested by the router; executed by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Say { target: String, text: String },
    Whisper { target: String, text: String },
    Notify { title: String, body: String },
    Connect,
    FetchJoke { target: String, context: MessageContext },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Operations exposed to the control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRequest {
    Connect,
    Disconnect,
    AddOrUpdateCommand(Command),
    SelectCommand(String),
    ReplaceConfiguration(Configuration),
    ExportCommands(PathBuf),
    ImportCommands(PathBuf),
    ListCommands,
    Shutdown,
}

/// Everything that can land in the dispatcher's mailbox.
#[derive(Debug)]
pub enum Inbound {
    Transport { session: u64, event: TransportEvent },
    Control(ControlRequest),
    JokeReady {
        target: String,
        context: MessageContext,
        joke: String,
    },
}
