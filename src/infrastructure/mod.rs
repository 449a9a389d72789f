//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatTransport, Store, Notifier, JokeProvider).

pub mod cache;
pub mod joke;
pub mod notify;
pub mod twitch;
