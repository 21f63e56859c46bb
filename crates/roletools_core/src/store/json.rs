//! JSON file-based store.

use super::{ConfigStore, StoreDocument, StoreResult};
use crate::{GuildId, GuildSettings, GuildSettingsPatch, RoleId, RoleSettings, RoleSettingsPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Store persisting the whole document to one JSON file.
///
/// The file is the only copy of the document. Every read loads it again, so
/// a long-running bot sees what a separate CLI process wrote. Updates load,
/// patch and rewrite it through a temporary file followed by a rename; the
/// file is untouched when an update fails.
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store, checking that an existing file parses.
    #[instrument(skip_all, fields(path = %file_path.as_ref().display()))]
    pub async fn open(file_path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self {
            file_path: file_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };
        let document = store.load().await?;
        info!(guilds = document.guilds.len(), "Store opened");
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Current document on disk; empty when the file does not exist yet.
    pub async fn load(&self) -> StoreResult<StoreDocument> {
        if !tokio::fs::try_exists(&self.file_path).await? {
            debug!(path = ?self.file_path, "No store file yet");
            return Ok(StoreDocument::default());
        }
        let json = tokio::fs::read_to_string(&self.file_path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, document: &StoreDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.file_path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.file_path).await?;
        debug!(path = ?self.file_path, "Store saved");
        Ok(())
    }

    async fn update(&self, patch: impl FnOnce(&mut StoreDocument) + Send) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        patch(&mut document);
        self.save(&document).await
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn guild_config(&self, guild_id: GuildId) -> StoreResult<GuildSettings> {
        Ok(self
            .load()
            .await?
            .guilds
            .remove(&guild_id)
            .unwrap_or_default())
    }

    #[instrument(skip(self, patch))]
    async fn set_guild_config(
        &self,
        guild_id: GuildId,
        patch: GuildSettingsPatch,
    ) -> StoreResult<()> {
        self.update(|document| document.patch_guild(guild_id, patch))
            .await
    }

    async fn role_config(&self, role_id: RoleId) -> StoreResult<RoleSettings> {
        Ok(self
            .load()
            .await?
            .roles
            .remove(&role_id)
            .unwrap_or_default())
    }

    #[instrument(skip(self, patch))]
    async fn set_role_config(&self, role_id: RoleId, patch: RoleSettingsPatch) -> StoreResult<()> {
        self.update(|document| document.patch_role(role_id, patch))
            .await
    }

    async fn all_guild_configs(&self) -> StoreResult<BTreeMap<GuildId, GuildSettings>> {
        Ok(self.load().await?.guilds)
    }
}
