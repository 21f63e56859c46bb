//! Top-level error wrapper types.

use crate::{
    AttachmentError, CapacityError, ConfigError, PlatformError, StoreError, ValidationError,
};

/// Every failure a roletools operation can report.
///
/// # Examples
///
/// ```
/// use roletools_error::{RoleToolsError, RoleToolsErrorKind, ValidationError};
///
/// let err: RoleToolsError = ValidationError::new("bad name").into();
/// assert!(matches!(err.kind(), RoleToolsErrorKind::Validation(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RoleToolsErrorKind {
    /// Invalid arguments
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Slot budget exceeded
    #[from(CapacityError)]
    Capacity(CapacityError),
    /// Chat platform rejected a request
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Persisted store failure
    #[from(StoreError)]
    Store(StoreError),
    /// Control could not be placed into a live view
    #[from(AttachmentError)]
    Attachment(AttachmentError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Roletools error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("RoleTools Error: {}", _0)]
pub struct RoleToolsError(Box<RoleToolsErrorKind>);

impl RoleToolsError {
    /// Create a new error from a kind.
    pub fn new(kind: RoleToolsErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RoleToolsErrorKind {
        &self.0
    }

    /// Whether this is a slot budget failure.
    pub fn is_capacity(&self) -> bool {
        matches!(self.kind(), RoleToolsErrorKind::Capacity(_))
    }

    /// Whether this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), RoleToolsErrorKind::Validation(_))
    }

    /// The platform error, if this wraps one.
    pub fn as_platform(&self) -> Option<&PlatformError> {
        match self.kind() {
            RoleToolsErrorKind::Platform(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to RoleToolsErrorKind
impl<T> From<T> for RoleToolsError
where
    T: Into<RoleToolsErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for roletools operations.
pub type RoleToolsResult<T> = std::result::Result<T, RoleToolsError>;
