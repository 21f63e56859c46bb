//! Slot budget error.

/// A message layout asked for more slots than a message can hold.
///
/// Buttons cost one slot and select menus cost five; a message holds 25.
///
/// # Examples
///
/// ```
/// use roletools_error::CapacityError;
///
/// let err = CapacityError::new(5, 5, 25);
/// assert_eq!(err.requested, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "Capacity Error: {} buttons and {} menus need {} slots but a message holds {} at line {} in {}",
    buttons,
    menus,
    requested,
    limit,
    line,
    file
)]
pub struct CapacityError {
    /// Number of buttons requested
    pub buttons: usize,
    /// Number of select menus requested
    pub menus: usize,
    /// Total slots the request would occupy
    pub requested: usize,
    /// Slot limit per message
    pub limit: usize,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CapacityError {
    /// Slots occupied by one select menu.
    pub const MENU_SLOTS: usize = 5;

    /// Create a capacity error for the given request.
    #[track_caller]
    pub fn new(buttons: usize, menus: usize, limit: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            buttons,
            menus,
            requested: buttons + menus * Self::MENU_SLOTS,
            limit,
            line: location.line(),
            file: location.file(),
        }
    }
}
