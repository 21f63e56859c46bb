//! Persisted configuration store.
//!
//! [`ConfigStore`] is the narrow key-value contract the engine depends on.
//! Two backends ship with the crate:
//! - [`MemoryStore`] keeps everything in process memory (tests, dry runs)
//! - [`JsonFileStore`] persists one JSON document to disk
//!
//! Read-modify-write cycles are not atomic at this layer. The engine
//! serialises them by holding the registry's per-guild lock.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::{GuildId, GuildSettings, GuildSettingsPatch, RoleId, RoleSettings, RoleSettingsPatch};
use async_trait::async_trait;
use roletools_error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Per-guild and per-role configuration access.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Guild settings; defaults when the guild has none.
    async fn guild_config(&self, guild_id: GuildId) -> StoreResult<GuildSettings>;

    /// Apply a partial update to a guild.
    async fn set_guild_config(&self, guild_id: GuildId, patch: GuildSettingsPatch)
    -> StoreResult<()>;

    /// Role back-references; defaults when the role has none.
    async fn role_config(&self, role_id: RoleId) -> StoreResult<RoleSettings>;

    /// Apply a partial update to a role.
    async fn set_role_config(&self, role_id: RoleId, patch: RoleSettingsPatch) -> StoreResult<()>;

    /// Settings of every guild that has any.
    async fn all_guild_configs(&self) -> StoreResult<BTreeMap<GuildId, GuildSettings>>;
}

/// Whole store contents, as written by [`JsonFileStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Guild settings by guild id
    #[serde(default)]
    pub guilds: BTreeMap<GuildId, GuildSettings>,
    /// Role back-references by role id
    #[serde(default)]
    pub roles: BTreeMap<RoleId, RoleSettings>,
}

impl StoreDocument {
    pub(crate) fn patch_guild(&mut self, guild_id: GuildId, patch: GuildSettingsPatch) {
        patch.apply(self.guilds.entry(guild_id).or_default());
    }

    pub(crate) fn patch_role(&mut self, role_id: RoleId, patch: RoleSettingsPatch) {
        let role = self.roles.entry(role_id).or_default();
        patch.apply(role);
        if role.buttons.is_empty() && role.select_menus.is_empty() {
            self.roles.remove(&role_id);
        }
    }
}
