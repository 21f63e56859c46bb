//! In-memory store.

use super::{ConfigStore, StoreDocument, StoreResult};
use crate::{GuildId, GuildSettings, GuildSettingsPatch, RoleId, RoleSettings, RoleSettingsPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<StoreDocument>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a document.
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> StoreDocument {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn guild_config(&self, guild_id: GuildId) -> StoreResult<GuildSettings> {
        Ok(self
            .document
            .read()
            .await
            .guilds
            .get(&guild_id)
            .cloned()
            .unwrap_or_default())
    }

    #[instrument(skip(self, patch))]
    async fn set_guild_config(
        &self,
        guild_id: GuildId,
        patch: GuildSettingsPatch,
    ) -> StoreResult<()> {
        debug!("Writing guild settings");
        self.document.write().await.patch_guild(guild_id, patch);
        Ok(())
    }

    async fn role_config(&self, role_id: RoleId) -> StoreResult<RoleSettings> {
        Ok(self
            .document
            .read()
            .await
            .roles
            .get(&role_id)
            .cloned()
            .unwrap_or_default())
    }

    #[instrument(skip(self, patch))]
    async fn set_role_config(&self, role_id: RoleId, patch: RoleSettingsPatch) -> StoreResult<()> {
        debug!("Writing role settings");
        self.document.write().await.patch_role(role_id, patch);
        Ok(())
    }

    async fn all_guild_configs(&self) -> StoreResult<BTreeMap<GuildId, GuildSettings>> {
        Ok(self.document.read().await.guilds.clone())
    }
}
