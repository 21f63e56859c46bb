//! Platform identifiers and message keys.

use roletools_error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw snowflake value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| ValidationError::new(format!("Invalid snowflake id: {s}")))
            }
        }
    };
}

snowflake!(
    /// Guild (server) identifier.
    GuildId
);
snowflake!(
    /// Channel or thread identifier.
    ChannelId
);
snowflake!(
    /// Message identifier.
    MessageId
);
snowflake!(
    /// Role identifier.
    RoleId
);
snowflake!(
    /// User identifier.
    UserId
);

impl RoleId {
    /// Mention syntax for this role.
    pub fn mention(self) -> String {
        format!("<@&{}>", self.0)
    }
}

/// Durable identifier of a rendered message: `"{channel_id}-{message_id}"`.
///
/// # Examples
///
/// ```
/// use roletools_core::{ChannelId, MessageId, MessageKey};
///
/// let key: MessageKey = "42-1001".parse().unwrap();
/// assert_eq!(key.channel_id(), ChannelId(42));
/// assert_eq!(key.message_id(), MessageId(1001));
/// assert_eq!(key.to_string(), "42-1001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageKey {
    channel_id: ChannelId,
    message_id: MessageId,
}

impl MessageKey {
    /// Build a key from its parts.
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }

    /// Channel half of the key.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Message half of the key.
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Link that opens the message in a client.
    pub fn jump_url(&self, guild_id: GuildId) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild_id, self.channel_id, self.message_id
        )
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.channel_id, self.message_id)
    }
}

impl FromStr for MessageKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, message) = s
            .split_once('-')
            .ok_or_else(|| ValidationError::new(format!("Malformed message key: {s}")))?;
        Ok(Self::new(channel.parse()?, message.parse()?))
    }
}

impl TryFrom<String> for MessageKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MessageKey> for String {
    fn from(key: MessageKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_key_rejects_garbage() {
        assert!("42".parse::<MessageKey>().is_err());
        assert!("abc-1".parse::<MessageKey>().is_err());
        assert!("1-2-3".parse::<MessageKey>().is_err());
    }

    #[test]
    fn test_message_key_serializes_as_string() {
        let key = MessageKey::new(ChannelId(7), MessageId(9));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"7-9\"");
        let back: MessageKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_jump_url() {
        let key = MessageKey::new(ChannelId(7), MessageId(9));
        assert_eq!(
            key.jump_url(GuildId(1)),
            "https://discord.com/channels/1/7/9"
        );
    }
}
