//! Validated creation requests for controls.

use crate::{ButtonStyle, MenuDef, MenuOptionDef, RoleButtonDef, RoleId, ToggleButtonDef};
use crate::control::validate_name;
use roletools_error::ValidationError;
use std::collections::{BTreeSet, HashSet};

/// Most options a select menu can carry.
pub const MAX_MENU_OPTIONS: usize = 25;

/// Request to create or redefine a single-role button.
///
/// # Examples
///
/// ```
/// use roletools_core::{ButtonRequestBuilder, ButtonStyle, RoleId};
///
/// let def = ButtonRequestBuilder::default()
///     .name("Role1")
///     .role_id(RoleId(10))
///     .style(ButtonStyle::Success)
///     .build()
///     .unwrap()
///     .into_def()
///     .unwrap();
/// assert_eq!(def.name, "role1");
/// assert_eq!(def.label, "@{role}");
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
pub struct ButtonRequest {
    /// Control name
    #[builder(setter(into))]
    pub name: String,
    /// Bound role
    #[builder(setter(into))]
    pub role_id: RoleId,
    /// Optional label
    #[builder(default, setter(into, strip_option))]
    pub label: Option<String>,
    /// Optional emoji
    #[builder(default, setter(into, strip_option))]
    pub emoji: Option<String>,
    /// Style
    #[builder(default)]
    pub style: ButtonStyle,
}

impl ButtonRequest {
    /// Validate and turn into a definition with no message references.
    pub fn into_def(self) -> Result<RoleButtonDef, ValidationError> {
        let name = validate_name(&self.name)?;
        let emoji = non_empty(self.emoji);
        let mut label = non_empty(self.label).unwrap_or_default();
        if label.is_empty() && emoji.is_none() {
            label = "@{role}".to_string();
        }
        Ok(RoleButtonDef {
            name,
            role_id: self.role_id,
            label,
            emoji,
            style: self.style,
            messages: BTreeSet::new(),
        })
    }
}

/// Request to create or redefine a toggle button.
#[derive(Debug, Clone, derive_builder::Builder)]
pub struct ToggleRequest {
    /// Control name
    #[builder(setter(into))]
    pub name: String,
    /// Preferred role
    #[builder(setter(into))]
    pub role1_id: RoleId,
    /// Alternate role
    #[builder(setter(into))]
    pub role2_id: RoleId,
    /// Optional label
    #[builder(default, setter(into, strip_option))]
    pub label: Option<String>,
    /// Optional emoji
    #[builder(default, setter(into, strip_option))]
    pub emoji: Option<String>,
    /// Style
    #[builder(default = "ButtonStyle::Secondary")]
    pub style: ButtonStyle,
}

impl ToggleRequest {
    /// Validate and turn into a definition with no message references.
    pub fn into_def(self) -> Result<ToggleButtonDef, ValidationError> {
        let name = validate_name(&self.name)?;
        if self.role1_id == self.role2_id {
            return Err(ValidationError::new(
                "A toggle button needs two different roles.",
            ));
        }
        let label = non_empty(self.label).unwrap_or_else(|| "{role1} ↔ {role2}".to_string());
        Ok(ToggleButtonDef {
            name,
            role1_id: self.role1_id,
            role2_id: self.role2_id,
            label,
            emoji: non_empty(self.emoji),
            style: self.style,
            messages: BTreeSet::new(),
        })
    }
}

/// Request to create or redefine a select menu.
#[derive(Debug, Clone, derive_builder::Builder)]
pub struct MenuRequest {
    /// Control name
    #[builder(setter(into))]
    pub name: String,
    /// Options in display order
    pub options: Vec<MenuOptionDef>,
    /// Placeholder text
    #[builder(default, setter(into, strip_option))]
    pub placeholder: Option<String>,
    /// Minimum selections, default 0
    #[builder(default, setter(strip_option))]
    pub min_values: Option<u8>,
    /// Maximum selections, default the number of options
    #[builder(default, setter(strip_option))]
    pub max_values: Option<u8>,
}

impl MenuRequest {
    /// Validate and turn into a definition with no message references.
    pub fn into_def(self) -> Result<MenuDef, ValidationError> {
        let name = validate_name(&self.name)?;
        if self.options.is_empty() {
            return Err(ValidationError::new(
                "A select menu needs at least one role option.",
            ));
        }
        if self.options.len() > MAX_MENU_OPTIONS {
            return Err(ValidationError::new(format!(
                "A select menu can have at most {MAX_MENU_OPTIONS} options."
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.options.iter().find(|o| !seen.insert(o.role_id)) {
            return Err(ValidationError::new(format!(
                "Role {} appears more than once in the menu.",
                dup.role_id
            )));
        }
        if let Some(blank) = self.options.iter().find(|o| o.label.trim().is_empty()) {
            return Err(ValidationError::new(format!(
                "The option for role {} needs a label.",
                blank.role_id
            )));
        }
        // Bounded by MAX_MENU_OPTIONS above.
        let count = self.options.len() as u8;
        let min_values = self.min_values.unwrap_or(0);
        let max_values = self.max_values.unwrap_or(count);
        if max_values == 0 || max_values > count || min_values > max_values {
            return Err(ValidationError::new(format!(
                "Selection bounds {min_values}..={max_values} do not fit {count} options."
            )));
        }
        Ok(MenuDef {
            name,
            options: self.options,
            placeholder: non_empty(self.placeholder),
            min_values,
            max_values,
            messages: BTreeSet::new(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
