//! Persisted configuration store errors.

/// Kinds of store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Reading or writing the backing file failed
    #[display("I/O failure: {}", _0)]
    Io(String),
    /// The stored document could not be encoded or decoded
    #[display("Malformed document: {}", _0)]
    Json(String),
    /// The store cannot serve requests
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
}

/// Store error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        StoreError::new(StoreErrorKind::Io(err.to_string()))
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        StoreError::new(StoreErrorKind::Json(err.to_string()))
    }
}
