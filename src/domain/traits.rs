//! # Domain Traits
//!
//! Abstract interfaces for the bot's collaborators (chat transport, persistence,
//! notification display, joke provider).
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::config::Configuration;
use crate::domain::types::{CommandSet, Inbound, Secrets, TransportEvent};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Abstract interface for a chat connection (e.g., Twitch IRC).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Open the connection. Success is reported later through a `Connected` event.
    async fn connect(&self) -> Result<()>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<()>;

    /// Send a message to a channel
    async fn say(&self, target: &str, text: &str) -> Result<()>;

    /// Send a private message to a user
    async fn whisper(&self, target: &str, text: &str) -> Result<()>;
}

/// Builds a transport for a fresh session.
pub trait TransportFactory: Send + Sync {
    fn create(&self, config: &Configuration, events: EventSink) -> Arc<dyn ChatTransport>;
}

/// Persistence for commands and secrets.
pub trait Store: Send + Sync {
    /// Persisted commands, or an empty set if none exist.
    fn load(&self) -> Result<CommandSet>;

    /// Replace a single top-level key of the cache.
    fn save(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Replace the whole cache.
    fn save_all(&self, doc: &CommandSet) -> Result<()>;

    /// Read a commands document from an arbitrary file.
    fn read_all(&self, path: &Path) -> Result<CommandSet>;

    /// Write a commands document to an arbitrary file.
    fn write_all(&self, path: &Path, doc: &CommandSet) -> Result<()>;

    fn secrets(&self) -> Result<Secrets>;

    fn save_secret(&self, secrets: &Secrets) -> Result<()>;
}

/// Fire-and-forget notification display.
pub trait Notifier: Send + Sync {
    fn show(&self, title: &str, body: &str);
}

#[async_trait]
pub trait JokeProvider: Send + Sync {
    async fn random_joke(&self) -> Result<String>;
}

/// Channel a transport uses to report events, stamped with its session number.
#[derive(Clone)]
pub struct EventSink {
    session: u64,
    tx: UnboundedSender<Inbound>,
}

impl EventSink {
    pub fn new(session: u64, tx: UnboundedSender<Inbound>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns false once the dispatcher has gone away.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(Inbound::Transport {
                session: self.session,
                event,
            })
            .is_ok()
    }
}
