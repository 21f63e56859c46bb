//! Chat platform client contract.
//!
//! The core never talks to a concrete chat service. Everything it needs goes
//! through [`Platform`]; the serenity adapter lives in `roletools_discord`.

use crate::{ChannelId, GuildId, MessageId, MessageKey, RenderedView, RoleId, UserId};
use async_trait::async_trait;
use roletools_error::PlatformError;

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Role data used for label rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    /// Role id
    pub id: RoleId,
    /// Current role name
    pub name: String,
    /// Member count, when the platform reports it
    pub member_count: Option<u64>,
}

impl RoleInfo {
    /// Role without member count information.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            member_count: None,
        }
    }
}

/// Channel data needed by cleanup and send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel id
    pub id: ChannelId,
    /// Channel name
    pub name: String,
}

/// Message as fetched from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchedMessage {
    /// Where the message lives
    pub key: MessageKey,
    /// Author of the message
    pub author_id: UserId,
}

/// Narrow client interface to the chat platform.
///
/// Implementations map remote failures onto [`PlatformError`] kinds:
/// `NotFound` for confirmed absence, `Forbidden` for permission denials,
/// `Http` for other rejected requests and `Transport` when no response came.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Id of the bot's own user.
    async fn current_user_id(&self) -> PlatformResult<UserId>;

    /// Post a new message carrying a rendered view.
    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: Option<&str>,
        view: &RenderedView,
    ) -> PlatformResult<MessageKey>;

    /// Replace the components of an existing message.
    async fn edit_message(&self, key: MessageKey, view: &RenderedView) -> PlatformResult<()>;

    /// Fetch a message.
    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<FetchedMessage>;

    /// Roles of a guild.
    async fn roles(&self, guild_id: GuildId) -> PlatformResult<Vec<RoleInfo>>;

    /// Look up a role; `None` when it does not exist.
    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> PlatformResult<Option<RoleInfo>> {
        Ok(self
            .roles(guild_id)
            .await?
            .into_iter()
            .find(|role| role.id == role_id))
    }

    /// Look up a channel or thread of the guild; `None` when it does not exist.
    async fn channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> PlatformResult<Option<ChannelInfo>>;

    /// Grant a role to a member.
    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> PlatformResult<()>;

    /// Remove a role from a member.
    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> PlatformResult<()>;
}
