//! [`Platform`] implementation over serenity's REST client.

use crate::error::{is_not_found, platform_error};
use crate::render::action_rows;
use async_trait::async_trait;
use roletools_core::{
    ChannelId, ChannelInfo, FetchedMessage, GuildId, MessageId, MessageKey, Platform,
    PlatformResult, RenderedView, RoleId, RoleInfo, UserId,
};
use roletools_error::{PlatformError, PlatformErrorKind};
use serenity::all::{Channel, CreateMessage, EditMessage};
use serenity::http::Http;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Discord REST client behind the [`Platform`] contract.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl std::fmt::Debug for SerenityPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityPlatform").finish_non_exhaustive()
    }
}

impl SerenityPlatform {
    /// Wrap an existing HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Build an HTTP client from a bot token.
    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }
}

/// Serenity ids panic on zero; reject such ids up front.
fn snowflake(raw: u64) -> PlatformResult<u64> {
    if raw == 0 {
        return Err(PlatformError::new(PlatformErrorKind::NotFound(
            "Snowflake id 0 does not exist".to_string(),
        )));
    }
    Ok(raw)
}

fn guild(id: GuildId) -> PlatformResult<serenity::all::GuildId> {
    Ok(serenity::all::GuildId::new(snowflake(id.get())?))
}

fn channel(id: ChannelId) -> PlatformResult<serenity::all::ChannelId> {
    Ok(serenity::all::ChannelId::new(snowflake(id.get())?))
}

fn message(id: MessageId) -> PlatformResult<serenity::all::MessageId> {
    Ok(serenity::all::MessageId::new(snowflake(id.get())?))
}

fn role(id: RoleId) -> PlatformResult<serenity::all::RoleId> {
    Ok(serenity::all::RoleId::new(snowflake(id.get())?))
}

fn user(id: UserId) -> PlatformResult<serenity::all::UserId> {
    Ok(serenity::all::UserId::new(snowflake(id.get())?))
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn current_user_id(&self) -> PlatformResult<UserId> {
        let me = self
            .http
            .get_current_user()
            .await
            .map_err(platform_error)?;
        Ok(UserId(me.id.get()))
    }

    #[instrument(skip(self, content, view), fields(rows = view.rows.len()))]
    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: Option<&str>,
        view: &RenderedView,
    ) -> PlatformResult<MessageKey> {
        let mut builder = CreateMessage::new().components(action_rows(view));
        if let Some(content) = content {
            builder = builder.content(content);
        }
        let sent = channel(channel_id)?
            .send_message(&*self.http, builder)
            .await
            .map_err(platform_error)?;
        debug!(message_id = %sent.id, "Message sent");
        Ok(MessageKey::new(channel_id, MessageId(sent.id.get())))
    }

    #[instrument(skip(self, view), fields(message_key = %key))]
    async fn edit_message(&self, key: MessageKey, view: &RenderedView) -> PlatformResult<()> {
        let builder = EditMessage::new().components(action_rows(view));
        channel(key.channel_id())?
            .edit_message(&*self.http, message(key.message_id())?, builder)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<FetchedMessage> {
        let fetched = channel(channel_id)?
            .message(&*self.http, message(message_id)?)
            .await
            .map_err(platform_error)?;
        Ok(FetchedMessage {
            key: MessageKey::new(channel_id, message_id),
            author_id: UserId(fetched.author.id.get()),
        })
    }

    async fn roles(&self, guild_id: GuildId) -> PlatformResult<Vec<RoleInfo>> {
        let roles = guild(guild_id)?
            .roles(&*self.http)
            .await
            .map_err(platform_error)?;
        Ok(roles
            .into_values()
            .map(|role| RoleInfo::new(RoleId(role.id.get()), role.name))
            .collect())
    }

    async fn channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> PlatformResult<Option<ChannelInfo>> {
        match self.http.get_channel(channel(channel_id)?).await {
            Ok(Channel::Guild(found)) if found.guild_id.get() == guild_id.get() => {
                Ok(Some(ChannelInfo {
                    id: channel_id,
                    name: found.name,
                }))
            }
            Ok(_) => Ok(None),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(platform_error(err)),
        }
    }

    #[instrument(skip(self, reason))]
    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> PlatformResult<()> {
        self.http
            .add_member_role(guild(guild_id)?, user(user_id)?, role(role_id)?, Some(reason))
            .await
            .map_err(platform_error)
    }

    #[instrument(skip(self, reason))]
    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> PlatformResult<()> {
        self.http
            .remove_member_role(guild(guild_id)?, user(user_id)?, role(role_id)?, Some(reason))
            .await
            .map_err(platform_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ids_are_rejected() {
        assert!(guild(GuildId(0)).is_err());
        assert_eq!(role(RoleId(5)).unwrap().get(), 5);
    }
}
