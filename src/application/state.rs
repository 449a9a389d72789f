//! # Router State
//!
//! Everything the router owns: the command registry, the session, the active
//! channel configuration and the editor selection. Owned by the dispatcher and
//! passed around explicitly; there is no global state.

use anyhow::Result;
use std::sync::Arc;

use crate::application::reconnect::ReconnectPolicy;
use crate::application::registry::CommandRegistry;
use crate::application::session::Session;
use crate::domain::config::{AppConfig, Configuration};
use crate::domain::traits::Store;

pub struct RouterState {
    pub registry: CommandRegistry,
    pub session: Session,
    pub config: Configuration,
    pub policy: ReconnectPolicy,
    pub prefix: char,
    /// Command picked for editing on the control surface.
    pub selected: Option<String>,
    pub store: Arc<dyn Store>,
}

impl RouterState {
    /// Loads commands and secrets from `store`.
    pub fn load(app: &AppConfig, store: Arc<dyn Store>) -> Result<Self> {
        let registry = CommandRegistry::load(store.clone())?;
        let config = store.secrets()?.config.unwrap_or_default();
        Ok(Self {
            registry,
            session: Session::new(),
            policy: ReconnectPolicy::new(config.auto_connect, &app.bot.name),
            config,
            prefix: app.bot.prefix,
            selected: None,
            store,
        })
    }

    /// The account allowed to run commands without the prefix.
    pub fn privileged(&self) -> &str {
        self.config.owner()
    }

    pub fn set_config(&mut self, config: Configuration) {
        self.policy.auto_connect = config.auto_connect;
        self.config = config;
    }
}
