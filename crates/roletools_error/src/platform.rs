//! Chat platform error types.

/// Failures reported by the chat platform client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The requested resource does not exist.
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// The bot is not allowed to see or change the resource.
    #[display("Forbidden: {}", _0)]
    Forbidden(String),
    /// The remote service rejected the request.
    #[display("HTTP {}: {}", status, reason)]
    Http {
        /// HTTP status code
        status: u16,
        /// Reason text provided by the remote service
        reason: String,
    },
    /// The request never produced a response (connection, gateway, decoding).
    #[display("Transport failure: {}", _0)]
    Transport(String),
}

/// Platform error with location tracking.
///
/// # Examples
///
/// ```
/// use roletools_error::{PlatformError, PlatformErrorKind};
///
/// let err = PlatformError::new(PlatformErrorKind::Forbidden("Missing Access".to_string()));
/// assert!(err.is_forbidden());
/// assert_eq!(err.reason(), "Missing Access");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// The kind of error that occurred
    pub kind: PlatformErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new platform error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Reason text suitable for showing to the user.
    pub fn reason(&self) -> &str {
        match &self.kind {
            PlatformErrorKind::NotFound(reason)
            | PlatformErrorKind::Forbidden(reason)
            | PlatformErrorKind::Transport(reason) => reason,
            PlatformErrorKind::Http { reason, .. } => reason,
        }
    }

    /// True when the platform confirmed the resource is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::NotFound(_))
    }

    /// True when the platform denied access.
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::Forbidden(_))
    }
}
