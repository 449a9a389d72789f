//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the bot.
//! Independent of the chat protocol and storage format, serving as the contract for other layers.

pub mod config;
pub mod traits;
pub mod types;
