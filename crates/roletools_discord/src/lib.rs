//! Discord adapter for roletools.
//!
//! This crate connects the platform-neutral engine in `roletools_core` to
//! Discord through serenity:
//!
//! - [`SerenityPlatform`] implements [`roletools_core::Platform`] on the REST client
//! - [`action_rows`] turns a rendered live view into serenity action rows
//! - [`RoleToolsHandler`] hydrates on `ready` and answers component clicks
//! - [`RoleToolsBot`] owns the gateway client

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bot;
mod error;
mod handler;
mod platform;
mod render;

pub use bot::RoleToolsBot;
pub use error::{classify_status, platform_error};
pub use handler::{GENERIC_FAILURE, RoleToolsHandler};
pub use platform::SerenityPlatform;
pub use render::{action_rows, parse_emoji};
