//! Reconciliation engine.
//!
//! [`RoleTools`] keeps three things consistent: the persisted guild
//! settings, the registry's live views, and the messages rendered on the
//! platform. Persisted state and the registry are updated together under the
//! guild lock; platform rendering is pushed best effort and every per-message
//! failure is reported back as a [`FailedFix`] instead of aborting the batch.

use crate::view::MAX_SLOTS;
use crate::{
    ButtonRequest, ChannelId, CleanupSummary, Control, ControlKind, ControlListing, ControlPreview,
    ControlRef, DeleteSummary, EditOutcome, FailedFix, GuildId, GuildSettings, GuildSettingsPatch,
    GuildState, HydrationReport, LiveView, MenuRequest, MessageId, MessageKey, RoleDirectory,
    RoleId, RoleSettingsPatch, ToggleRequest,
};
use crate::{ConfigStore, GuildContext, Platform, Registry};
use roletools_error::{
    AttachmentError, CapacityError, PlatformErrorKind, RoleToolsResult, ValidationError,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Longest message text the platform accepts.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Role button service: the entry point of every control operation.
#[derive(Clone)]
pub struct RoleTools {
    store: Arc<dyn ConfigStore>,
    platform: Arc<dyn Platform>,
    registry: Arc<Registry>,
}

impl std::fmt::Debug for RoleTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleTools").finish_non_exhaustive()
    }
}

impl RoleTools {
    /// Create a service over a store and a platform client, with an empty registry.
    pub fn new(store: Arc<dyn ConfigStore>, platform: Arc<dyn Platform>) -> Self {
        Self::with_registry(store, platform, Arc::new(Registry::new()))
    }

    /// Create a service sharing an existing registry.
    pub fn with_registry(
        store: Arc<dyn ConfigStore>,
        platform: Arc<dyn Platform>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            store,
            platform,
            registry,
        }
    }

    /// The registry this service mutates.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The persisted store.
    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    pub(crate) fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Hydrate the registry from every guild in the store.
    ///
    /// Only reading the store can fail; placement problems are logged.
    #[instrument(skip(self))]
    pub async fn initialize_controls(&self) -> RoleToolsResult<HydrationReport> {
        let all = self.store.all_guild_configs().await?;
        Ok(self.registry.hydrate(&all).await)
    }

    /// Merge the store's current settings for one guild into its live views.
    ///
    /// Disabled slots survive; see [`GuildState::resync`].
    #[instrument(skip(self))]
    pub async fn resync_guild(&self, guild_id: GuildId) -> RoleToolsResult<HydrationReport> {
        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let settings = self.store.guild_config(guild_id).await?;
        let report = state.resync(guild_id, settings);
        info!(guild_id = %guild_id, ?report, "Guild resynced from store");
        Ok(report)
    }

    /// Create or redefine a single-role button.
    pub async fn create_button(
        &self,
        guild_id: GuildId,
        request: ButtonRequest,
    ) -> RoleToolsResult<ControlPreview> {
        let def = request.into_def()?;
        self.create_control(guild_id, Control::Button(def)).await
    }

    /// Create or redefine a toggle button.
    pub async fn create_toggle(
        &self,
        guild_id: GuildId,
        request: ToggleRequest,
    ) -> RoleToolsResult<ControlPreview> {
        let def = request.into_def()?;
        self.create_control(guild_id, Control::Toggle(def)).await
    }

    /// Create or redefine a select menu.
    pub async fn create_menu(
        &self,
        guild_id: GuildId,
        request: MenuRequest,
    ) -> RoleToolsResult<ControlPreview> {
        let def = request.into_def()?;
        self.create_control(guild_id, Control::Menu(def)).await
    }

    /// Persist a validated control and push it to every message that renders it.
    ///
    /// A previous definition with the same name and the same primary role
    /// hands over its message references; any other redefinition starts
    /// with none.
    #[instrument(skip(self, control), fields(guild_id = %guild_id, control = %control.name()))]
    pub async fn create_control(
        &self,
        guild_id: GuildId,
        mut control: Control,
    ) -> RoleToolsResult<ControlPreview> {
        let directory = self.directory(guild_id).await?;
        if let Some(missing) = control
            .role_ids()
            .into_iter()
            .find(|role_id| directory.role(*role_id).is_none())
        {
            return Err(ValidationError::new(format!("Role {missing} does not exist.")).into());
        }

        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let mut settings = self.store.guild_config(guild_id).await?;

        let kind = control.kind();
        let previous = settings.control(kind, control.name());
        if let Some(previous) = previous
            .as_ref()
            .filter(|previous| previous.primary_role() == control.primary_role())
        {
            *control.messages_mut() = previous.messages().clone();
        }

        settings.put(control.clone());
        self.store
            .set_guild_config(guild_id, patch_for(&settings, kind))
            .await?;
        let stale_roles: Vec<RoleId> = previous
            .as_ref()
            .map(|previous| {
                let current = control.role_ids();
                previous
                    .role_ids()
                    .into_iter()
                    .filter(|role_id| !current.contains(role_id))
                    .collect()
            })
            .unwrap_or_default();
        self.unlink_roles(kind, control.name(), &stale_roles).await?;
        self.link_roles(kind, control.name(), &control.role_ids())
            .await?;
        state.settings = settings;
        info!(messages = control.messages().len(), "Control stored");

        // Replace in place on every message already rendering this control.
        let mut failed_fixes = Vec::new();
        let mut touched = Vec::new();
        for key in control.messages() {
            let Some(view) = state.views.get_mut(key) else {
                continue;
            };
            for custom_id in control.custom_ids() {
                view.remove(&custom_id);
            }
            match view.add(control.clone()) {
                Ok(()) => touched.push(*key),
                Err(err) => {
                    error!(message_key = %key, error = %err, "Could not replace control on message");
                    failed_fixes.push(FailedFix::new(guild_id, *key, err.to_string()));
                }
            }
        }
        failed_fixes.extend(self.rerender(guild_id, &state, &touched, &directory).await);

        let mut preview_view = LiveView::new();
        preview_view.add(control.clone())?;
        Ok(ControlPreview {
            preview: preview_view.render(&directory),
            control,
            failed_fixes,
        })
    }

    /// Delete a control, leaving its rendered instances in place but disabled.
    #[instrument(skip(self), fields(guild_id = %guild_id, control = %control_ref))]
    pub async fn delete_control(
        &self,
        guild_id: GuildId,
        control_ref: ControlRef,
    ) -> RoleToolsResult<DeleteSummary> {
        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let mut settings = self.store.guild_config(guild_id).await?;
        let name = control_ref.name.to_lowercase();
        let control = settings
            .remove(control_ref.kind, &name)
            .ok_or_else(|| ValidationError::new(format!("There is no {control_ref}.")))?;

        let custom_ids = control.custom_ids();
        let mut disabled = 0;
        let mut touched = Vec::new();
        for (key, view) in state.views.iter_mut() {
            let count = view.disable(&custom_ids);
            if count > 0 {
                disabled += count;
                touched.push(*key);
            }
        }

        self.store
            .set_guild_config(guild_id, patch_for(&settings, control_ref.kind))
            .await?;
        self.unlink_roles(control_ref.kind, &name, &control.role_ids())
            .await?;
        state.settings = settings;
        info!(disabled, views = touched.len(), "Control deleted");

        let failed_fixes = if touched.is_empty() {
            Vec::new()
        } else {
            let directory = self.directory(guild_id).await?;
            self.rerender(guild_id, &state, &touched, &directory).await
        };
        Ok(DeleteSummary {
            control,
            disabled,
            views_touched: touched.len(),
            failed_fixes,
        })
    }

    /// Post a new message carrying the given controls.
    ///
    /// The slot budget is checked before anything is sent. On success the
    /// message key is recorded on every included control.
    #[instrument(skip(self, controls, text), fields(guild_id = %guild_id, channel_id = %channel_id, count = controls.len()))]
    pub async fn send_controls_to_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        controls: &[ControlRef],
        text: Option<&str>,
    ) -> RoleToolsResult<MessageKey> {
        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let mut settings = self.store.guild_config(guild_id).await?;
        let controls = resolve_controls(&settings, controls)?;
        check_capacity(&controls)?;
        let view = build_view(&controls)?;

        let directory = self.directory(guild_id).await?;
        let content = text.map(truncate_text);
        let key = self
            .platform
            .send_message(channel_id, content.as_deref(), &view.render(&directory))
            .await
            .inspect_err(|err| error!(error = %err, "Failed to send controls"))?;

        for control in &controls {
            settings.add_message(control.kind(), control.name(), key);
        }
        self.store
            .set_guild_config(guild_id, GuildSettingsPatch::full(&settings))
            .await?;
        state.settings = settings;
        state.views.insert(key, view);
        info!(message_key = %key, "Controls sent");
        Ok(key)
    }

    /// Replace the controls on a message the bot authored.
    ///
    /// Message references are rewritten even when the platform edit fails;
    /// the failure is reported in the outcome.
    #[instrument(skip(self, controls), fields(guild_id = %guild_id, channel_id = %channel_id, message_id = %message_id))]
    pub async fn edit_message_controls(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
        controls: &[ControlRef],
    ) -> RoleToolsResult<EditOutcome> {
        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let mut settings = self.store.guild_config(guild_id).await?;
        let controls = resolve_controls(&settings, controls)?;
        check_capacity(&controls)?;
        let view = build_view(&controls)?;

        let message = self.platform.fetch_message(channel_id, message_id).await?;
        let bot_id = self.platform.current_user_id().await?;
        if message.author_id != bot_id {
            return Err(ValidationError::new(
                "I cannot edit that message because I did not send it.",
            )
            .into());
        }
        let key = message.key;

        let released = settings.forget_message(&key);
        debug!(released = released.len(), "Released previous controls");
        for control in &controls {
            settings.add_message(control.kind(), control.name(), key);
        }

        let directory = self.directory(guild_id).await?;
        let edit_failure = match self.platform.edit_message(key, &view.render(&directory)).await {
            Ok(()) => None,
            Err(err) => {
                error!(message_key = %key, error = %err, "Failed to edit message; index updated anyway");
                Some(err.reason().to_string())
            }
        };

        self.store
            .set_guild_config(guild_id, GuildSettingsPatch::full(&settings))
            .await?;
        state.settings = settings;
        state.views.insert(key, view);
        Ok(EditOutcome {
            message_key: key,
            edit_failure,
        })
    }

    /// Drop message references whose message or channel is confirmed gone.
    ///
    /// Forbidden and transport failures keep the reference.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn cleanup_stale_references(
        &self,
        guild_id: GuildId,
    ) -> RoleToolsResult<CleanupSummary> {
        let state = self.registry.guild(guild_id).await;
        let mut state = state.lock().await;
        let mut settings = self.store.guild_config(guild_id).await?;

        let keys: BTreeSet<MessageKey> = settings
            .controls()
            .flat_map(|control| control.messages().clone())
            .collect();
        let mut summary = CleanupSummary {
            checked: keys.len(),
            ..CleanupSummary::default()
        };

        for key in keys {
            match self.probe(guild_id, key).await {
                Probe::Present => {}
                Probe::Inconclusive => summary.inconclusive += 1,
                Probe::Gone => {
                    summary.removed += settings.forget_message(&key).len();
                    if state.views.remove(&key).is_some() {
                        summary.views_dropped += 1;
                    }
                    debug!(message_key = %key, "Dropped stale message reference");
                }
            }
        }

        if summary.removed > 0 {
            self.store
                .set_guild_config(guild_id, GuildSettingsPatch::full(&settings))
                .await?;
        }
        state.settings = settings;
        info!(
            checked = summary.checked,
            removed = summary.removed,
            inconclusive = summary.inconclusive,
            "Cleanup finished"
        );
        Ok(summary)
    }

    /// Every control of a guild with its referencing messages.
    pub async fn list_controls(&self, guild_id: GuildId) -> RoleToolsResult<Vec<ControlListing>> {
        let settings = self.store.guild_config(guild_id).await?;
        Ok(settings
            .controls()
            .map(|control| ControlListing::new(guild_id, &control))
            .collect())
    }

    /// Role lookup for rendering labels.
    pub(crate) async fn directory(&self, guild_id: GuildId) -> RoleToolsResult<RoleDirectory> {
        Ok(RoleDirectory::new(self.platform.roles(guild_id).await?))
    }

    async fn probe(&self, guild_id: GuildId, key: MessageKey) -> Probe {
        match self.platform.channel(guild_id, key.channel_id()).await {
            Ok(Some(_)) => {}
            Ok(None) => return Probe::Gone,
            Err(err) if err.is_not_found() => return Probe::Gone,
            Err(err) => {
                warn!(message_key = %key, error = %err, "Could not resolve channel, keeping reference");
                return Probe::Inconclusive;
            }
        }
        match self
            .platform
            .fetch_message(key.channel_id(), key.message_id())
            .await
        {
            Ok(_) => Probe::Present,
            Err(err) => match err.kind {
                PlatformErrorKind::NotFound(_) | PlatformErrorKind::Http { .. } => Probe::Gone,
                PlatformErrorKind::Forbidden(_) | PlatformErrorKind::Transport(_) => {
                    warn!(message_key = %key, error = %err, "Could not confirm message is gone, keeping reference");
                    Probe::Inconclusive
                }
            },
        }
    }

    async fn rerender(
        &self,
        guild_id: GuildId,
        state: &GuildState,
        keys: &[MessageKey],
        directory: &RoleDirectory,
    ) -> Vec<FailedFix> {
        let mut failed = Vec::new();
        for key in keys {
            let Some(view) = state.views.get(key) else {
                continue;
            };
            if let Err(err) = self.platform.edit_message(*key, &view.render(directory)).await {
                error!(message_key = %key, error = %err, "Failed to re-render message");
                failed.push(FailedFix::new(guild_id, *key, err.reason()));
            }
        }
        failed
    }

    async fn link_roles(&self, kind: ControlKind, name: &str, role_ids: &[RoleId]) -> RoleToolsResult<()> {
        for role_id in role_ids {
            let mut role = self.store.role_config(*role_id).await?;
            if role.link(kind, name) {
                self.store
                    .set_role_config(*role_id, RoleSettingsPatch::full(&role))
                    .await?;
            }
        }
        Ok(())
    }

    async fn unlink_roles(
        &self,
        kind: ControlKind,
        name: &str,
        role_ids: &[RoleId],
    ) -> RoleToolsResult<()> {
        for role_id in role_ids {
            let mut role = self.store.role_config(*role_id).await?;
            if role.unlink(kind, name) {
                self.store
                    .set_role_config(*role_id, RoleSettingsPatch::full(&role))
                    .await?;
            }
        }
        Ok(())
    }
}

enum Probe {
    Present,
    Inconclusive,
    Gone,
}

fn patch_for(settings: &GuildSettings, kind: ControlKind) -> GuildSettingsPatch {
    match kind {
        ControlKind::Button => GuildSettingsPatch {
            buttons: Some(settings.buttons.clone()),
            select_menus: None,
        },
        ControlKind::Menu => GuildSettingsPatch {
            buttons: None,
            select_menus: Some(settings.select_menus.clone()),
        },
    }
}

/// Look up the referenced controls, keeping the first of any custom id.
fn resolve_controls(settings: &GuildSettings, refs: &[ControlRef]) -> RoleToolsResult<Vec<Control>> {
    if refs.is_empty() {
        return Err(
            ValidationError::new("You need to provide at least one button or menu.").into(),
        );
    }
    let mut seen = HashSet::new();
    let mut controls = Vec::new();
    for control_ref in refs {
        let control = settings
            .control(control_ref.kind, &control_ref.name)
            .ok_or_else(|| ValidationError::new(format!("There is no {control_ref}.")))?;
        if seen.insert(control.custom_id()) {
            controls.push(control);
        }
    }
    Ok(controls)
}

fn check_capacity(controls: &[Control]) -> Result<(), CapacityError> {
    let menus = controls
        .iter()
        .filter(|control| control.kind() == ControlKind::Menu)
        .count();
    let buttons = controls.len() - menus;
    let used: usize = controls.iter().map(Control::slot_cost).sum();
    if used > MAX_SLOTS {
        return Err(CapacityError::new(buttons, menus, MAX_SLOTS));
    }
    Ok(())
}

fn build_view(controls: &[Control]) -> Result<LiveView, AttachmentError> {
    let mut view = LiveView::new();
    for control in controls {
        view.add(control.clone())?;
    }
    Ok(view)
}

fn truncate_text(text: &str) -> String {
    text.chars().take(MAX_MESSAGE_CHARS).collect()
}
