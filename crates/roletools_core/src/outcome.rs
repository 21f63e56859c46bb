//! Batch result values reported by the reconciliation engine.

use crate::{ButtonStyle, Control, ControlKind, GuildId, MessageKey, RenderedView, RoleId};

/// A message that could not be brought up to date with a control change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFix {
    /// Message that kept its old rendering
    pub message_key: MessageKey,
    /// Link to the message
    pub jump_url: String,
    /// Why the update failed
    pub reason: String,
}

impl FailedFix {
    pub(crate) fn new(guild_id: GuildId, message_key: MessageKey, reason: impl Into<String>) -> Self {
        Self {
            message_key,
            jump_url: message_key.jump_url(guild_id),
            reason: reason.into(),
        }
    }
}

/// Result of creating or redefining a control.
#[derive(Debug, Clone)]
pub struct ControlPreview {
    /// The stored definition, with its carried-over message references
    pub control: Control,
    /// How the control renders on its own
    pub preview: RenderedView,
    /// Messages the change could not be pushed to
    pub failed_fixes: Vec<FailedFix>,
}

/// Result of deleting a control.
#[derive(Debug, Clone)]
pub struct DeleteSummary {
    /// The removed definition
    pub control: Control,
    /// Rendered instances now disabled
    pub disabled: usize,
    /// Views that were re-rendered
    pub views_touched: usize,
    /// Messages whose disabled rendering could not be pushed
    pub failed_fixes: Vec<FailedFix>,
}

/// Result of replacing the controls on an existing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The edited message
    pub message_key: MessageKey,
    /// Platform reason when the visual edit failed; the index was updated anyway
    pub edit_failure: Option<String>,
}

impl EditOutcome {
    /// Whether the platform message shows the new controls.
    pub fn is_rendered(&self) -> bool {
        self.edit_failure.is_none()
    }
}

/// Result of a cleanup pass over one guild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Distinct messages checked
    pub checked: usize,
    /// Control-to-message references removed
    pub removed: usize,
    /// Messages kept because their absence could not be confirmed
    pub inconclusive: usize,
    /// Live views dropped from the registry
    pub views_dropped: usize,
}

/// One line of the control listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlListing {
    /// Settings map of the control
    pub kind: ControlKind,
    /// Control name
    pub name: String,
    /// Custom id of its rendered instances
    pub custom_id: String,
    /// Roles the control can grant
    pub role_ids: Vec<RoleId>,
    /// Label template (placeholder for menus)
    pub label: String,
    /// Style for buttons
    pub style: Option<ButtonStyle>,
    /// Emoji for buttons
    pub emoji: Option<String>,
    /// Links to every referencing message
    pub jump_urls: Vec<String>,
}

impl ControlListing {
    pub(crate) fn new(guild_id: GuildId, control: &Control) -> Self {
        Self {
            kind: control.kind(),
            name: control.name().to_string(),
            custom_id: control.custom_id(),
            role_ids: control.role_ids(),
            label: control.label_template().to_string(),
            style: control.style(),
            emoji: control.emoji().map(str::to_string),
            jump_urls: control
                .messages()
                .iter()
                .map(|key| key.jump_url(guild_id))
                .collect(),
        }
    }
}
