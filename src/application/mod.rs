//! # Application Layer
//!
//! Contains the core decision logic of the bot.
//! This includes the command registry and resolver, session and reconnect
//! state, the router, and the dispatcher that executes its actions.

pub mod builtins;
pub mod dispatcher;
pub mod logging;
pub mod reconnect;
pub mod registry;
pub mod resolver;
pub mod router;
pub mod session;
pub mod state;
