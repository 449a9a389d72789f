//! # Strings Module
//!
//! Centralizes user-facing strings and log lines.
//! Ensures consistency in messaging and easier updates.

pub mod logs;
pub mod messages;
