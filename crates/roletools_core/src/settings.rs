//! Persisted per-guild and per-role settings.

use crate::{ButtonDef, Control, ControlKind, MenuDef, MessageKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted guild configuration: `{ buttons, select_menus }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Buttons by lowercased name
    #[serde(default)]
    pub buttons: BTreeMap<String, ButtonDef>,
    /// Select menus by lowercased name
    #[serde(default)]
    pub select_menus: BTreeMap<String, MenuDef>,
}

impl GuildSettings {
    /// Look up a control by kind and (case-insensitive) name.
    pub fn control(&self, kind: ControlKind, name: &str) -> Option<Control> {
        let name = name.to_lowercase();
        match kind {
            ControlKind::Button => self.buttons.get(&name).cloned().map(Control::from),
            ControlKind::Menu => self.select_menus.get(&name).cloned().map(Control::from),
        }
    }

    /// Every control, buttons first.
    pub fn controls(&self) -> impl Iterator<Item = Control> + '_ {
        self.buttons
            .values()
            .cloned()
            .map(Control::from)
            .chain(self.select_menus.values().cloned().map(Control::from))
    }

    /// Insert or replace a control under its name.
    pub fn put(&mut self, control: Control) {
        let name = control.name().to_string();
        match control {
            Control::Button(def) => {
                self.buttons.insert(name, ButtonDef::Role(def));
            }
            Control::Toggle(def) => {
                self.buttons.insert(name, ButtonDef::Toggle(def));
            }
            Control::Menu(def) => {
                self.select_menus.insert(name, def);
            }
        }
    }

    /// Remove a control, returning it if present.
    pub fn remove(&mut self, kind: ControlKind, name: &str) -> Option<Control> {
        match kind {
            ControlKind::Button => self.buttons.remove(name).map(Control::from),
            ControlKind::Menu => self.select_menus.remove(name).map(Control::from),
        }
    }

    /// Add a message reference to a control. Returns false if the control is unknown.
    pub fn add_message(&mut self, kind: ControlKind, name: &str, key: MessageKey) -> bool {
        match self.messages_mut(kind, name) {
            Some(messages) => {
                messages.insert(key);
                true
            }
            None => false,
        }
    }

    /// Drop a message key from every control that references it.
    ///
    /// Returns the names of the controls that changed.
    pub fn forget_message(&mut self, key: &MessageKey) -> Vec<(ControlKind, String)> {
        let mut changed = Vec::new();
        for (name, def) in self.buttons.iter_mut() {
            let messages = match def {
                ButtonDef::Role(def) => &mut def.messages,
                ButtonDef::Toggle(def) => &mut def.messages,
            };
            if messages.remove(key) {
                changed.push((ControlKind::Button, name.clone()));
            }
        }
        for (name, def) in self.select_menus.iter_mut() {
            if def.messages.remove(key) {
                changed.push((ControlKind::Menu, name.clone()));
            }
        }
        changed
    }

    fn messages_mut(
        &mut self,
        kind: ControlKind,
        name: &str,
    ) -> Option<&mut std::collections::BTreeSet<MessageKey>> {
        match kind {
            ControlKind::Button => self.buttons.get_mut(name).map(|def| match def {
                ButtonDef::Role(def) => &mut def.messages,
                ButtonDef::Toggle(def) => &mut def.messages,
            }),
            ControlKind::Menu => self.select_menus.get_mut(name).map(|def| &mut def.messages),
        }
    }
}

/// Partial guild update: `None` leaves a map untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildSettingsPatch {
    /// Replacement `buttons` map
    pub buttons: Option<BTreeMap<String, ButtonDef>>,
    /// Replacement `select_menus` map
    pub select_menus: Option<BTreeMap<String, MenuDef>>,
}

impl GuildSettingsPatch {
    /// Patch replacing both maps with the given settings.
    pub fn full(settings: &GuildSettings) -> Self {
        Self {
            buttons: Some(settings.buttons.clone()),
            select_menus: Some(settings.select_menus.clone()),
        }
    }

    /// Apply the patch onto existing settings.
    pub fn apply(self, settings: &mut GuildSettings) {
        if let Some(buttons) = self.buttons {
            settings.buttons = buttons;
        }
        if let Some(select_menus) = self.select_menus {
            settings.select_menus = select_menus;
        }
    }
}

/// Persisted role back-reference index: the names of controls bound to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSettings {
    /// Button names
    #[serde(default)]
    pub buttons: Vec<String>,
    /// Select menu names
    #[serde(default)]
    pub select_menus: Vec<String>,
}

impl RoleSettings {
    fn names_mut(&mut self, kind: ControlKind) -> &mut Vec<String> {
        match kind {
            ControlKind::Button => &mut self.buttons,
            ControlKind::Menu => &mut self.select_menus,
        }
    }

    /// Record a control name; returns false if it was already present.
    pub fn link(&mut self, kind: ControlKind, name: &str) -> bool {
        let names = self.names_mut(kind);
        if names.iter().any(|n| n == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }

    /// Forget a control name; returns false if it was absent.
    pub fn unlink(&mut self, kind: ControlKind, name: &str) -> bool {
        let names = self.names_mut(kind);
        let before = names.len();
        names.retain(|n| n != name);
        names.len() != before
    }
}

/// Partial role update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSettingsPatch {
    /// Replacement button name list
    pub buttons: Option<Vec<String>>,
    /// Replacement menu name list
    pub select_menus: Option<Vec<String>>,
}

impl RoleSettingsPatch {
    /// Patch replacing both lists.
    pub fn full(settings: &RoleSettings) -> Self {
        Self {
            buttons: Some(settings.buttons.clone()),
            select_menus: Some(settings.select_menus.clone()),
        }
    }

    /// Apply the patch onto existing settings.
    pub fn apply(self, settings: &mut RoleSettings) {
        if let Some(buttons) = self.buttons {
            settings.buttons = buttons;
        }
        if let Some(select_menus) = self.select_menus {
            settings.select_menus = select_menus;
        }
    }
}
