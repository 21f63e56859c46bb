//! Activation handling: what happens when a member clicks a rendered control.
//!
//! The adapter turns a platform interaction into an [`ActivationEvent`].
//! [`RoleTools::handle_activation`] walks it through
//! `Idle -> Validating -> Applying -> Responding -> Idle`. The role delta
//! itself is computed by the pure [`plan_activation`]; only the role
//! mutations and the reply leave the core.

use crate::{Control, GuildId, MessageKey, RoleId, RoleTools, UserId};
use roletools_error::RoleToolsResult;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Audit log reason attached to every role change.
pub const ROLE_CHANGE_REASON: &str = "Role button activation";

/// A member activated a rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    /// Guild the message lives in
    pub guild_id: GuildId,
    /// Member who clicked
    pub user_id: UserId,
    /// Message carrying the control
    pub message_key: MessageKey,
    /// Custom id of the activated instance
    pub custom_id: String,
    /// Roles the member holds right now
    pub member_roles: HashSet<RoleId>,
    /// Selected option values, for menus
    pub selected: Vec<String>,
    /// Whether the bot may manage roles in the guild
    pub bot_can_manage_roles: bool,
}

/// Stages of one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ActivationPhase {
    /// Waiting for an event
    Idle,
    /// Checking capability and resolving the control
    Validating,
    /// Mutating the member's roles
    Applying,
    /// Replying to the member
    Responding,
}

/// Role delta for one activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationPlan {
    /// Roles to remove, applied first
    pub revoke: Vec<RoleId>,
    /// Roles to add
    pub grant: Vec<RoleId>,
    /// Toggle exchange: the granted role replaces the revoked one
    pub swap: bool,
}

impl ActivationPlan {
    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.grant.is_empty() && self.revoke.is_empty()
    }

    /// Confirmation text naming the roles that changed.
    ///
    /// A toggle swap names only the role now held.
    pub fn describe(&self) -> String {
        let mentions = |roles: &[RoleId]| {
            roles
                .iter()
                .map(|role| role.mention())
                .collect::<Vec<_>>()
                .join(", ")
        };
        match (self.grant.as_slice(), self.revoke.as_slice()) {
            ([], []) => "Your roles are unchanged.".to_string(),
            ([role], []) => format!("You now have the role {}!", role.mention()),
            ([role], [_]) if self.swap => format!("You now have the role {}!", role.mention()),
            ([], [role]) => format!("The role {} has been removed.", role.mention()),
            (grant, []) => format!("You now have the roles {}.", mentions(grant)),
            ([], revoke) => format!("Removed the roles {}.", mentions(revoke)),
            (grant, revoke) => format!(
                "Added {} and removed {}.",
                mentions(grant),
                mentions(revoke)
            ),
        }
    }
}

/// Compute the role delta of activating a control.
///
/// - single-role button: remove the role if held, otherwise add it
/// - toggle: role1 held swaps to role2, role2 held swaps to role1, neither grants role1
/// - menu: grant selected options not held, revoke unselected options that are held
///
/// Menu values that are not role ids of the menu's options are ignored.
pub fn plan_activation(
    control: &Control,
    member_roles: &HashSet<RoleId>,
    selected: &[String],
) -> ActivationPlan {
    match control {
        Control::Button(def) => {
            if member_roles.contains(&def.role_id) {
                ActivationPlan {
                    revoke: vec![def.role_id],
                    grant: Vec::new(),
                    swap: false,
                }
            } else {
                ActivationPlan {
                    revoke: Vec::new(),
                    grant: vec![def.role_id],
                    swap: false,
                }
            }
        }
        Control::Toggle(def) => {
            if member_roles.contains(&def.role1_id) {
                ActivationPlan {
                    revoke: vec![def.role1_id],
                    grant: vec![def.role2_id],
                    swap: true,
                }
            } else if member_roles.contains(&def.role2_id) {
                ActivationPlan {
                    revoke: vec![def.role2_id],
                    grant: vec![def.role1_id],
                    swap: true,
                }
            } else {
                ActivationPlan {
                    revoke: Vec::new(),
                    grant: vec![def.role1_id],
                    swap: false,
                }
            }
        }
        Control::Menu(def) => {
            let chosen: HashSet<RoleId> = selected
                .iter()
                .filter_map(|value| value.parse::<RoleId>().ok())
                .collect();
            let mut plan = ActivationPlan::default();
            for role_id in def.role_ids() {
                let held = member_roles.contains(&role_id);
                match (chosen.contains(&role_id), held) {
                    (true, false) => plan.grant.push(role_id),
                    (false, true) => plan.revoke.push(role_id),
                    _ => {}
                }
            }
            plan
        }
    }
}

/// Ephemeral reply shown to the member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text
    pub content: String,
    /// Only the member sees it
    pub ephemeral: bool,
}

impl Reply {
    fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// How an activation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Roles were changed as planned
    Applied(ActivationPlan),
    /// The bot lacks role management capability
    Denied,
    /// No active control answers to the custom id
    Unavailable,
}

/// Outcome plus the reply to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationResult {
    /// What happened
    pub outcome: ActivationOutcome,
    /// What to tell the member
    pub reply: Reply,
}

impl RoleTools {
    /// Process one activation.
    ///
    /// Role mutation failures propagate to the caller, which reports a
    /// generic failure to the member.
    #[instrument(
        skip(self, event),
        fields(guild_id = %event.guild_id, user_id = %event.user_id, custom_id = %event.custom_id)
    )]
    pub async fn handle_activation(
        &self,
        event: ActivationEvent,
    ) -> RoleToolsResult<ActivationResult> {
        let mut phase = ActivationPhase::Validating;
        debug!(%phase, "Activation received");
        if !event.bot_can_manage_roles {
            warn!("Missing role management capability");
            return Ok(ActivationResult {
                outcome: ActivationOutcome::Denied,
                reply: Reply::ephemeral("I don't have permission to give out roles here."),
            });
        }

        let control = match self.active_control(&event).await? {
            Some(control) => control,
            None => {
                warn!(message_key = %event.message_key, "Activated control is not registered");
                return Ok(ActivationResult {
                    outcome: ActivationOutcome::Unavailable,
                    reply: Reply::ephemeral("This control is no longer available."),
                });
            }
        };

        phase = ActivationPhase::Applying;
        let plan = plan_activation(&control, &event.member_roles, &event.selected);
        debug!(%phase, ?plan, "Applying role delta");
        for role_id in &plan.revoke {
            self.platform()
                .remove_role(event.guild_id, event.user_id, *role_id, ROLE_CHANGE_REASON)
                .await?;
        }
        for role_id in &plan.grant {
            self.platform()
                .add_role(event.guild_id, event.user_id, *role_id, ROLE_CHANGE_REASON)
                .await?;
        }

        phase = ActivationPhase::Responding;
        let reply = Reply::ephemeral(plan.describe());
        info!(
            %phase,
            control = %control.name(),
            granted = plan.grant.len(),
            revoked = plan.revoke.len(),
            "Activation applied"
        );
        phase = ActivationPhase::Idle;
        debug!(%phase, "Activation finished");
        Ok(ActivationResult {
            outcome: ActivationOutcome::Applied(plan),
            reply,
        })
    }

    /// Resolve the enabled control behind an event, resyncing the guild once on a miss.
    ///
    /// A disabled instance answers `None` straight away.
    async fn active_control(&self, event: &ActivationEvent) -> RoleToolsResult<Option<Control>> {
        match self.lookup(event).await {
            Lookup::Enabled(control) => return Ok(Some(control)),
            Lookup::Disabled => return Ok(None),
            Lookup::Missing => {}
        }
        debug!("Control missing from registry, resyncing guild");
        self.resync_guild(event.guild_id).await?;
        match self.lookup(event).await {
            Lookup::Enabled(control) => Ok(Some(control)),
            Lookup::Disabled | Lookup::Missing => Ok(None),
        }
    }

    async fn lookup(&self, event: &ActivationEvent) -> Lookup {
        let Some(view) = self
            .registry()
            .view(event.guild_id, event.message_key)
            .await
        else {
            return Lookup::Missing;
        };
        match view.get(&event.custom_id) {
            Some(slot) if slot.is_disabled() => Lookup::Disabled,
            Some(slot) => Lookup::Enabled(slot.control().clone()),
            None => Lookup::Missing,
        }
    }
}

enum Lookup {
    Enabled(Control),
    Disabled,
    Missing,
}
