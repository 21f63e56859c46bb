//! Control model: persisted definitions and the polymorphic control.
//!
//! A control is a clickable or selectable element bound to roles. Three
//! variants exist:
//! - [`RoleButtonDef`] grants or removes one role
//! - [`ToggleButtonDef`] swaps between exactly two roles
//! - [`MenuDef`] offers a set of roles through a select menu
//!
//! Definitions are what the store persists. [`Control`] is the closed
//! variant set the registry and the live views work with.

use crate::{ButtonStyle, MessageKey, RoleId, RoleInfo};
use roletools_error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Slots a button occupies in a live view.
pub const BUTTON_SLOTS: usize = 1;
/// Slots a select menu occupies in a live view.
pub const MENU_SLOTS: usize = 5;

/// Resolves role information at render time.
pub trait GuildContext {
    /// Look up a role by id.
    fn role(&self, role_id: RoleId) -> Option<&RoleInfo>;
}

/// Role lookup table built from a platform role listing.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    roles: HashMap<RoleId, RoleInfo>,
}

impl RoleDirectory {
    /// Build a directory from a list of roles.
    pub fn new(roles: impl IntoIterator<Item = RoleInfo>) -> Self {
        Self {
            roles: roles.into_iter().map(|role| (role.id, role)).collect(),
        }
    }

    /// Number of known roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no roles are known.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl GuildContext for RoleDirectory {
    fn role(&self, role_id: RoleId) -> Option<&RoleInfo> {
        self.roles.get(&role_id)
    }
}

/// Platform identity of a rendered control instance.
///
/// # Examples
///
/// ```
/// use roletools_core::{custom_id_for, RoleId};
///
/// assert_eq!(custom_id_for("vip", RoleId(77)), "vip-77");
/// ```
pub fn custom_id_for(name: &str, role_id: RoleId) -> String {
    format!("{name}-{role_id}")
}

/// Normalise and validate a control name.
///
/// Names are case-insensitive keys: the returned name is lowercased.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("A control name cannot be empty."));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(
            "There cannot be a space in the name of a button or menu.",
        ));
    }
    Ok(name.to_lowercase())
}

/// Which settings map a control lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ControlKind {
    /// `buttons` map (single-role and toggle buttons).
    Button,
    /// `select_menus` map.
    Menu,
}

/// Reference to a named control, as supplied by the command surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{} {}", kind, name)]
pub struct ControlRef {
    /// Settings map the control lives in
    pub kind: ControlKind,
    /// Control name (matched case-insensitively)
    pub name: String,
}

impl ControlRef {
    /// Reference a button by name.
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::Button,
            name: name.into(),
        }
    }

    /// Reference a select menu by name.
    pub fn menu(name: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::Menu,
            name: name.into(),
        }
    }
}

/// Button bound to a single role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleButtonDef {
    /// Lowercased control name
    pub name: String,
    /// Role granted or removed
    pub role_id: RoleId,
    /// Label template
    #[serde(default)]
    pub label: String,
    /// Emoji as `name:id`, `a:name:id` or a unicode character
    #[serde(default)]
    pub emoji: Option<String>,
    /// Background style
    #[serde(default)]
    pub style: ButtonStyle,
    /// Messages currently rendering this button
    #[serde(default)]
    pub messages: BTreeSet<MessageKey>,
}

/// Button swapping between two roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleButtonDef {
    /// Lowercased control name
    pub name: String,
    /// Preferred role, granted when the member holds neither
    pub role1_id: RoleId,
    /// Alternate role
    pub role2_id: RoleId,
    /// Label template
    #[serde(default)]
    pub label: String,
    /// Emoji as `name:id`, `a:name:id` or a unicode character
    #[serde(default)]
    pub emoji: Option<String>,
    /// Background style
    #[serde(default = "default_toggle_style")]
    pub style: ButtonStyle,
    /// Messages currently rendering this button
    #[serde(default)]
    pub messages: BTreeSet<MessageKey>,
}

fn default_toggle_style() -> ButtonStyle {
    ButtonStyle::Secondary
}

/// Entry of the persisted `buttons` map.
///
/// The two shapes are told apart by their role fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonDef {
    /// `role1_id` / `role2_id` record
    Toggle(ToggleButtonDef),
    /// `role_id` record
    Role(RoleButtonDef),
}

/// One selectable option of a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOptionDef {
    /// Role the option stands for
    pub role_id: RoleId,
    /// Label template
    pub label: String,
    /// Optional description line
    #[serde(default)]
    pub description: Option<String>,
    /// Optional emoji
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Select menu offering one or more roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDef {
    /// Lowercased control name
    pub name: String,
    /// Options in display order
    pub options: Vec<MenuOptionDef>,
    /// Placeholder template shown when nothing is selected
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Minimum number of selections
    #[serde(default)]
    pub min_values: u8,
    /// Maximum number of selections
    pub max_values: u8,
    /// Messages currently rendering this menu
    #[serde(default)]
    pub messages: BTreeSet<MessageKey>,
}

impl MenuDef {
    /// Roles of all options.
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.options.iter().map(|option| option.role_id).collect()
    }
}

/// The interactive control capability: a closed set of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Single-role button
    Button(RoleButtonDef),
    /// Two-role toggle button
    Toggle(ToggleButtonDef),
    /// Select menu
    Menu(MenuDef),
}

impl From<ButtonDef> for Control {
    fn from(def: ButtonDef) -> Self {
        match def {
            ButtonDef::Role(def) => Self::Button(def),
            ButtonDef::Toggle(def) => Self::Toggle(def),
        }
    }
}

impl From<MenuDef> for Control {
    fn from(def: MenuDef) -> Self {
        Self::Menu(def)
    }
}

impl Control {
    /// Lowercased control name.
    pub fn name(&self) -> &str {
        match self {
            Self::Button(def) => &def.name,
            Self::Toggle(def) => &def.name,
            Self::Menu(def) => &def.name,
        }
    }

    /// Settings map this control belongs to.
    pub fn kind(&self) -> ControlKind {
        match self {
            Self::Button(_) | Self::Toggle(_) => ControlKind::Button,
            Self::Menu(_) => ControlKind::Menu,
        }
    }

    /// Role that participates in the custom id.
    ///
    /// `None` only for a menu without options, which validation never admits.
    pub fn primary_role(&self) -> Option<RoleId> {
        match self {
            Self::Button(def) => Some(def.role_id),
            Self::Toggle(def) => Some(def.role1_id),
            Self::Menu(def) => def.options.first().map(|option| option.role_id),
        }
    }

    /// Every role this control can grant.
    pub fn role_ids(&self) -> Vec<RoleId> {
        match self {
            Self::Button(def) => vec![def.role_id],
            Self::Toggle(def) => vec![def.role1_id, def.role2_id],
            Self::Menu(def) => def.role_ids(),
        }
    }

    /// Platform identity of a rendered instance: `"{name}-{primary_role}"`.
    pub fn custom_id(&self) -> String {
        match self.primary_role() {
            Some(role_id) => custom_id_for(self.name(), role_id),
            None => self.name().to_string(),
        }
    }

    /// Every custom id an instance of this control may have been rendered with.
    ///
    /// Toggles answer for both role-derived ids.
    pub fn custom_ids(&self) -> Vec<String> {
        match self {
            Self::Toggle(def) => vec![
                custom_id_for(&def.name, def.role1_id),
                custom_id_for(&def.name, def.role2_id),
            ],
            _ => vec![self.custom_id()],
        }
    }

    /// Slots this control occupies in a live view.
    pub fn slot_cost(&self) -> usize {
        match self {
            Self::Button(_) | Self::Toggle(_) => BUTTON_SLOTS,
            Self::Menu(_) => MENU_SLOTS,
        }
    }

    /// Messages currently rendering this control.
    pub fn messages(&self) -> &BTreeSet<MessageKey> {
        match self {
            Self::Button(def) => &def.messages,
            Self::Toggle(def) => &def.messages,
            Self::Menu(def) => &def.messages,
        }
    }

    /// Mutable access to the message back-references.
    pub fn messages_mut(&mut self) -> &mut BTreeSet<MessageKey> {
        match self {
            Self::Button(def) => &mut def.messages,
            Self::Toggle(def) => &mut def.messages,
            Self::Menu(def) => &mut def.messages,
        }
    }

    /// Configured emoji, if any. Menus carry emoji per option.
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Self::Button(def) => def.emoji.as_deref(),
            Self::Toggle(def) => def.emoji.as_deref(),
            Self::Menu(_) => None,
        }
    }

    /// Button style; `None` for menus.
    pub fn style(&self) -> Option<ButtonStyle> {
        match self {
            Self::Button(def) => Some(def.style),
            Self::Toggle(def) => Some(def.style),
            Self::Menu(_) => None,
        }
    }

    /// Raw label template (placeholder for menus).
    pub fn label_template(&self) -> &str {
        match self {
            Self::Button(def) => &def.label,
            Self::Toggle(def) => &def.label,
            Self::Menu(def) => def.placeholder.as_deref().unwrap_or_default(),
        }
    }

    /// Resolve placeholders in the label against live role data.
    ///
    /// `{role}` and `{count}` refer to the bound role, `{role1}` and
    /// `{role2}` to the roles of a toggle.
    pub fn render_label(&self, ctx: &dyn GuildContext) -> String {
        match self {
            Self::Button(def) => render_role_template(&def.label, def.role_id, ctx),
            Self::Toggle(def) => def
                .label
                .replace("{role1}", &role_name(def.role1_id, ctx))
                .replace("{role2}", &role_name(def.role2_id, ctx)),
            Self::Menu(def) => match (def.placeholder.as_deref(), def.options.first()) {
                (Some(placeholder), Some(first)) => {
                    render_role_template(placeholder, first.role_id, ctx)
                }
                (Some(placeholder), None) => placeholder.to_string(),
                (None, _) => String::new(),
            },
        }
    }

    /// Convert back into the persisted `buttons` map entry, if a button.
    pub fn into_button_def(self) -> Option<ButtonDef> {
        match self {
            Self::Button(def) => Some(ButtonDef::Role(def)),
            Self::Toggle(def) => Some(ButtonDef::Toggle(def)),
            Self::Menu(_) => None,
        }
    }

    /// Convert back into the persisted `select_menus` map entry, if a menu.
    pub fn into_menu_def(self) -> Option<MenuDef> {
        match self {
            Self::Menu(def) => Some(def),
            _ => None,
        }
    }
}

/// Render a label template bound to one role.
pub fn render_role_template(template: &str, role_id: RoleId, ctx: &dyn GuildContext) -> String {
    let mut label = template.replace("{role}", &role_name(role_id, ctx));
    if label.contains("{count}") {
        let count = ctx
            .role(role_id)
            .and_then(|role| role.member_count)
            .map(|count| count.to_string())
            .unwrap_or_else(|| "?".to_string());
        label = label.replace("{count}", &count);
    }
    label
}

fn role_name(role_id: RoleId, ctx: &dyn GuildContext) -> String {
    ctx.role(role_id)
        .map(|role| role.name.clone())
        .unwrap_or_else(|| format!("deleted-role-{role_id}"))
}
