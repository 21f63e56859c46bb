//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the roletools binary.

mod commands;
mod handlers;

pub use commands::{ButtonCommands, Cli, Commands, MenuCommands, MenuOptionArg, MessageCommands};
pub use handlers::execute;
