//! In-memory registry of live views and the settings mirror, per guild.
//!
//! The registry is an owned object with an explicit lifecycle: built empty,
//! filled by [`Registry::hydrate`] at startup and emptied by
//! [`Registry::shutdown`]. Each guild's state sits behind its own async
//! mutex; operations on different guilds never contend.

use crate::{Control, GuildId, GuildSettings, LiveView, MessageKey};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument};

/// Mutable state of one guild.
#[derive(Debug, Clone, Default)]
pub struct GuildState {
    /// Live views by message key
    pub views: HashMap<MessageKey, LiveView>,
    /// Mirror of the persisted guild settings
    pub settings: GuildSettings,
}

impl GuildState {
    /// Attach every persisted control to the views of the messages it references.
    ///
    /// Controls already present (same custom id) are skipped. Placement
    /// failures are logged and counted; they never stop the pass.
    ///
    /// The persisted layout keeps no order across controls, so a view rebuilt
    /// here lays out buttons before menus, each in name order. That matches
    /// the order the command surface sends them in, except that buttons sent
    /// out of name order come back sorted.
    pub fn attach_settings(&mut self, guild_id: GuildId, settings: GuildSettings) -> HydrationReport {
        let mut report = HydrationReport::default();
        for control in settings.controls() {
            for key in control.messages() {
                let view = self.views.entry(*key).or_default();
                match view.add(control.clone()) {
                    Ok(()) => report.attached += 1,
                    Err(err) if err.is_duplicate() => report.skipped += 1,
                    Err(err) => {
                        error!(
                            guild_id = %guild_id,
                            message_key = %key,
                            jump_url = %key.jump_url(guild_id),
                            control = %control.name(),
                            error = %err,
                            "Could not attach control to message"
                        );
                        report.failed += 1;
                    }
                }
            }
        }
        self.settings = settings;
        report
    }

    /// Bring existing views in line with newer persisted settings.
    ///
    /// Disabled slots stay as they are. An enabled slot whose definition
    /// changed takes the new definition in place; one whose control no
    /// longer references the message is detached; one whose control is gone
    /// from the settings is disabled, as a local delete would have done.
    /// Controls not yet shown are then attached as in
    /// [`attach_settings`](Self::attach_settings).
    pub fn resync(&mut self, guild_id: GuildId, settings: GuildSettings) -> HydrationReport {
        let mut wanted: HashMap<MessageKey, HashMap<String, Control>> = HashMap::new();
        let mut defined = HashSet::new();
        for control in settings.controls() {
            defined.extend(control.custom_ids());
            for key in control.messages() {
                wanted
                    .entry(*key)
                    .or_default()
                    .insert(control.custom_id(), control.clone());
            }
        }

        for (key, view) in self.views.iter_mut() {
            let enabled: Vec<String> = view
                .slots()
                .iter()
                .filter(|slot| !slot.is_disabled())
                .map(|slot| slot.custom_id().to_string())
                .collect();
            for custom_id in enabled {
                match wanted.get(key).and_then(|controls| controls.get(&custom_id)) {
                    Some(control) => {
                        if !view.replace(control.clone()) {
                            view.remove(&custom_id);
                        }
                    }
                    None if defined.contains(&custom_id) => {
                        view.remove(&custom_id);
                    }
                    None => {
                        view.disable(std::slice::from_ref(&custom_id));
                        debug!(message_key = %key, %custom_id, "Disabled control removed from store");
                    }
                }
            }
        }
        self.views.retain(|_, view| !view.is_empty());
        self.attach_settings(guild_id, settings)
    }
}

/// Outcome counts of a hydration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Controls placed into a view
    pub attached: usize,
    /// Controls whose custom id was already present
    pub skipped: usize,
    /// Controls that did not fit their view
    pub failed: usize,
}

impl std::ops::AddAssign for HydrationReport {
    fn add_assign(&mut self, other: Self) {
        self.attached += other.attached;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Guild-scoped registry handle.
#[derive(Debug, Default)]
pub struct Registry {
    guilds: RwLock<HashMap<GuildId, Arc<Mutex<GuildState>>>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a guild, created empty on first use.
    ///
    /// Lock the returned mutex for the whole duration of an operation.
    pub async fn guild(&self, guild_id: GuildId) -> Arc<Mutex<GuildState>> {
        if let Some(state) = self.guilds.read().await.get(&guild_id) {
            return Arc::clone(state);
        }
        let mut guilds = self.guilds.write().await;
        Arc::clone(guilds.entry(guild_id).or_default())
    }

    /// Guilds with state in memory.
    pub async fn guild_ids(&self) -> Vec<GuildId> {
        let mut ids: Vec<GuildId> = self.guilds.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Copy of one live view.
    pub async fn view(&self, guild_id: GuildId, key: MessageKey) -> Option<LiveView> {
        let state = self.guild(guild_id).await;
        let state = state.lock().await;
        state.views.get(&key).cloned()
    }

    /// Build live views for every guild from persisted settings.
    ///
    /// Safe to run repeatedly: controls already attached are skipped.
    #[instrument(skip_all, fields(guilds = all_settings.len()))]
    pub async fn hydrate(&self, all_settings: &BTreeMap<GuildId, GuildSettings>) -> HydrationReport {
        let mut total = HydrationReport::default();
        for (guild_id, settings) in all_settings {
            let state = self.guild(*guild_id).await;
            let report = state
                .lock()
                .await
                .attach_settings(*guild_id, settings.clone());
            debug!(guild_id = %guild_id, ?report, "Guild hydrated");
            total += report;
        }
        info!(
            attached = total.attached,
            skipped = total.skipped,
            failed = total.failed,
            "Registry hydrated"
        );
        total
    }

    /// Drop all in-memory state.
    pub async fn shutdown(&self) {
        let mut guilds = self.guilds.write().await;
        info!(guilds = guilds.len(), "Registry shut down");
        guilds.clear();
    }
}
