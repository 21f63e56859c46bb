//! Serenity event handler for role buttons.
//!
//! Hydrates the registry once the gateway reports ready, then turns every
//! component interaction into an [`ActivationEvent`] for the engine.

use roletools_core::{ActivationEvent, ChannelId, GuildId, MessageId, MessageKey, RoleId, RoleTools, UserId};
use serenity::all::{
    ComponentInteraction, ComponentInteractionDataKind, CreateInteractionResponse,
    CreateInteractionResponseMessage, Interaction, Ready,
};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use tracing::{debug, error, info, instrument, warn};

/// Reply shown when an activation fails for a reason the member cannot fix.
pub const GENERIC_FAILURE: &str = "Something went wrong while updating your roles.";

/// Event handler dispatching component clicks to the engine.
#[derive(Debug, Clone)]
pub struct RoleToolsHandler {
    service: RoleTools,
}

impl RoleToolsHandler {
    /// Handler over a role button service.
    pub fn new(service: RoleTools) -> Self {
        Self { service }
    }

    /// Gateway intents the bot needs.
    ///
    /// Component interactions arrive without any privileged intent.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    /// Build an activation event from a component interaction.
    ///
    /// Returns `None` outside guilds.
    pub fn activation_event(component: &ComponentInteraction) -> Option<ActivationEvent> {
        let guild_id = component.guild_id?;
        let member = component.member.as_ref()?;
        let selected = match &component.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values.clone(),
            _ => Vec::new(),
        };
        Some(ActivationEvent {
            guild_id: GuildId(guild_id.get()),
            user_id: UserId(component.user.id.get()),
            message_key: MessageKey::new(
                ChannelId(component.channel_id.get()),
                MessageId(component.message.id.get()),
            ),
            custom_id: component.data.custom_id.clone(),
            member_roles: member.roles.iter().map(|role| RoleId(role.get())).collect(),
            selected,
            bot_can_manage_roles: component
                .app_permissions
                .is_some_and(|permissions| permissions.manage_roles()),
        })
    }

    #[instrument(skip_all, fields(custom_id = %component.data.custom_id))]
    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let Some(event) = Self::activation_event(component) else {
            debug!("Ignoring component interaction outside a guild");
            return;
        };
        let content = match self.service.handle_activation(event).await {
            Ok(result) => result.reply.content,
            Err(err) => {
                error!(error = %err, "Activation failed");
                match err.as_platform() {
                    Some(platform) => format!("{GENERIC_FAILURE} ({})", platform.reason()),
                    None => GENERIC_FAILURE.to_string(),
                }
            }
        };
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        if let Err(err) = component.create_response(&ctx.http, response).await {
            warn!(error = %err, "Failed to answer interaction");
        }
    }
}

#[async_trait]
impl EventHandler for RoleToolsHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to Discord");
        match self.service.initialize_controls().await {
            Ok(report) => info!(
                attached = report.attached,
                skipped = report.skipped,
                failed = report.failed,
                "Role controls initialized"
            ),
            Err(err) => error!(error = %err, "Failed to read role controls from store"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Component(component) = interaction {
            self.handle_component(&ctx, &component).await;
        }
    }
}
