//! Error types for roletools.
//!
//! This crate provides the error taxonomy shared by the control registry,
//! the reconciliation engine and the platform adapters.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use roletools_error::{RoleToolsResult, ValidationError};
//!
//! fn check_name(name: &str) -> RoleToolsResult<()> {
//!     if name.contains(' ') {
//!         Err(ValidationError::new("There cannot be a space in the name"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_name("role one").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod capacity;
mod config;
mod error;
mod platform;
mod store;
mod validation;

pub use attachment::{AttachmentError, AttachmentErrorKind};
pub use capacity::CapacityError;
pub use config::ConfigError;
pub use error::{RoleToolsError, RoleToolsErrorKind, RoleToolsResult};
pub use platform::{PlatformError, PlatformErrorKind};
pub use store::{StoreError, StoreErrorKind};
pub use validation::ValidationError;
