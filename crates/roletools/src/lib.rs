//! Persistent role buttons and role menus for Discord.
//!
//! This is the facade crate: it re-exports the engine from `roletools_core`,
//! the error types from `roletools_error` and, with the `discord` feature,
//! the serenity adapter. It also owns configuration loading and logging
//! setup for the `roletools` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod observability;

pub use config::{DiscordConfig, LoggingConfig, RoleToolsConfig, StoreConfig};
pub use roletools_core::*;
pub use roletools_error::*;

#[cfg(feature = "discord")]
pub use roletools_discord::{
    GENERIC_FAILURE, RoleToolsBot, RoleToolsHandler, SerenityPlatform, action_rows, parse_emoji,
};
