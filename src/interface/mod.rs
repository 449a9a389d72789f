//! # Interface Layer
//!
//! Entry points for the operator: command-line arguments and the stdin control
//! console that stands in for the configuration and command-editor pages.

pub mod cli;
pub mod console;
