//! Role button registry, reconciliation engine and interaction handling.
//!
//! This crate holds everything about role buttons and menus that does not
//! depend on a concrete chat service:
//!
//! - **Control model**: buttons, toggles and select menus ([`Control`])
//! - **Live views**: slot layout of the controls on one message ([`LiveView`])
//! - **Registry**: per-guild views and settings mirror ([`Registry`])
//! - **Engine**: create, send, edit, delete and cleanup ([`RoleTools`])
//! - **Interaction**: activation state machine ([`RoleTools::handle_activation`])
//!
//! The chat platform and the persisted store are reached through the
//! [`Platform`] and [`ConfigStore`] traits.
//!
//! # Example
//!
//! ```
//! use roletools_core::{ChannelId, MessageId, MessageKey};
//!
//! let key: MessageKey = "10-20".parse().unwrap();
//! assert_eq!(key, MessageKey::new(ChannelId(10), MessageId(20)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod control;
mod engine;
mod ids;
mod interaction;
mod outcome;
mod platform;
mod registry;
mod request;
mod settings;
mod store;
mod style;
mod view;

pub use control::{
    BUTTON_SLOTS, ButtonDef, Control, ControlKind, ControlRef, GuildContext, MENU_SLOTS, MenuDef,
    MenuOptionDef, RoleButtonDef, RoleDirectory, ToggleButtonDef, custom_id_for,
    render_role_template, validate_name,
};
pub use engine::{MAX_MESSAGE_CHARS, RoleTools};
pub use ids::{ChannelId, GuildId, MessageId, MessageKey, RoleId, UserId};
pub use interaction::{
    ActivationEvent, ActivationOutcome, ActivationPhase, ActivationPlan, ActivationResult,
    ROLE_CHANGE_REASON, Reply, plan_activation,
};
pub use outcome::{
    CleanupSummary, ControlListing, ControlPreview, DeleteSummary, EditOutcome, FailedFix,
};
pub use platform::{ChannelInfo, FetchedMessage, Platform, PlatformResult, RoleInfo};
pub use registry::{GuildState, HydrationReport, Registry};
pub use request::{
    ButtonRequest, ButtonRequestBuilder, MAX_MENU_OPTIONS, MenuRequest, MenuRequestBuilder,
    ToggleRequest, ToggleRequestBuilder,
};
pub use settings::{GuildSettings, GuildSettingsPatch, RoleSettings, RoleSettingsPatch};
pub use store::{ConfigStore, JsonFileStore, MemoryStore, StoreDocument, StoreResult};
pub use style::ButtonStyle;
pub use view::{
    LiveView, MAX_ROWS, MAX_SLOTS, ROW_WIDTH, RenderedButton, RenderedMenu, RenderedOption,
    RenderedRow, RenderedView, Slot,
};

pub use roletools_error::{RoleToolsError, RoleToolsErrorKind, RoleToolsResult};
