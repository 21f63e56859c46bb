//! Live view attachment errors.

/// Reasons a control could not be placed into a live view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AttachmentErrorKind {
    /// A control with the same custom id already occupies a slot.
    #[display("Custom id already present: {}", _0)]
    DuplicateCustomId(String),
    /// No row has room for a control of this shape.
    #[display("No room for {} ({} slots)", custom_id, slots)]
    NoRoom {
        /// Custom id of the rejected control
        custom_id: String,
        /// Slots the control needs
        slots: usize,
    },
}

/// Attachment error with location tracking.
///
/// Non-fatal during bulk propagation: callers record it per message.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Attachment Error: {} at line {} in {}", kind, line, file)]
pub struct AttachmentError {
    /// The kind of error that occurred
    pub kind: AttachmentErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AttachmentError {
    /// Create a new attachment error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AttachmentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the control was rejected because its custom id was already present.
    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, AttachmentErrorKind::DuplicateCustomId(_))
    }
}
