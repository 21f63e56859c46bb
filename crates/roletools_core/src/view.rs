//! Live views: the in-memory layout of controls attached to one message.
//!
//! A message has 5 rows of width 5. A button takes one cell of a row, a
//! select menu takes a whole row. Controls go into the first row with room,
//! so a view never holds more than 25 slots.

use crate::control::{BUTTON_SLOTS, MENU_SLOTS, render_role_template};
use crate::{ButtonStyle, Control, GuildContext};
use roletools_error::{AttachmentError, AttachmentErrorKind};

/// Slot budget of one message.
pub const MAX_SLOTS: usize = 25;
/// Rows of one message.
pub const MAX_ROWS: usize = 5;
/// Slots per row.
pub const ROW_WIDTH: usize = 5;

/// A control occupying a position in a live view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    control: Control,
    custom_id: String,
    row: usize,
    disabled: bool,
}

impl Slot {
    /// The control rendered here.
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Custom id of this instance.
    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    /// Row the control sits in.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Whether the instance has been made inert.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Ordered controls attached to one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveView {
    slots: Vec<Slot>,
}

impl LiveView {
    /// Empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots in insertion order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the view has no controls.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots occupied by all controls.
    pub fn used_slots(&self) -> usize {
        self.slots.iter().map(|slot| slot.control.slot_cost()).sum()
    }

    /// Whether a control with this custom id is attached.
    pub fn contains(&self, custom_id: &str) -> bool {
        self.get(custom_id).is_some()
    }

    /// Find a slot by custom id.
    pub fn get(&self, custom_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.custom_id == custom_id)
    }

    /// Attach a control in the first row with room.
    ///
    /// # Errors
    ///
    /// `DuplicateCustomId` if an instance with the same custom id is already
    /// attached, `NoRoom` if no row can take a control of this shape.
    pub fn add(&mut self, control: Control) -> Result<(), AttachmentError> {
        let custom_id = control.custom_id();
        if self.contains(&custom_id) {
            return Err(AttachmentError::new(AttachmentErrorKind::DuplicateCustomId(
                custom_id,
            )));
        }
        let cost = control.slot_cost();
        let weights = self.row_weights();
        let row = weights
            .iter()
            .position(|weight| weight + cost <= ROW_WIDTH)
            .ok_or_else(|| {
                AttachmentError::new(AttachmentErrorKind::NoRoom {
                    custom_id: custom_id.clone(),
                    slots: cost,
                })
            })?;
        self.slots.push(Slot {
            control,
            custom_id,
            row,
            disabled: false,
        });
        Ok(())
    }

    /// Detach every instance with this custom id. Remaining controls keep their rows.
    pub fn remove(&mut self, custom_id: &str) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.custom_id != custom_id);
        before - self.slots.len()
    }

    /// Swap the definition behind an enabled slot with the same custom id.
    ///
    /// The slot keeps its row. Returns `false` when there is no such slot or
    /// the new control has a different shape.
    pub fn replace(&mut self, control: Control) -> bool {
        let custom_id = control.custom_id();
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.custom_id == custom_id && !slot.disabled)
        else {
            return false;
        };
        if slot.control.slot_cost() != control.slot_cost() {
            return false;
        }
        slot.control = control;
        true
    }

    /// Mark matching instances inert without freeing their slots.
    pub fn disable(&mut self, custom_ids: &[String]) -> usize {
        let mut disabled = 0;
        for slot in self
            .slots
            .iter_mut()
            .filter(|slot| custom_ids.contains(&slot.custom_id))
        {
            slot.disabled = true;
            disabled += 1;
        }
        disabled
    }

    fn row_weights(&self) -> [usize; MAX_ROWS] {
        let mut weights = [0; MAX_ROWS];
        for slot in &self.slots {
            if let Some(weight) = weights.get_mut(slot.row) {
                *weight += slot.control.slot_cost();
            }
        }
        weights
    }

    /// Render into the payload handed to the platform.
    pub fn render(&self, ctx: &dyn GuildContext) -> RenderedView {
        let mut rows = Vec::new();
        for row in 0..MAX_ROWS {
            let in_row: Vec<&Slot> = self.slots.iter().filter(|s| s.row == row).collect();
            let Some(first) = in_row.first() else {
                continue;
            };
            if let Control::Menu(_) = first.control {
                rows.push(RenderedRow::Menu(render_menu(first, ctx)));
            } else {
                rows.push(RenderedRow::Buttons(
                    in_row.iter().map(|slot| render_button(slot, ctx)).collect(),
                ));
            }
        }
        RenderedView { rows }
    }
}

fn render_button(slot: &Slot, ctx: &dyn GuildContext) -> RenderedButton {
    let label = slot.control.render_label(ctx);
    RenderedButton {
        custom_id: slot.custom_id.clone(),
        label: (!label.is_empty()).then_some(label),
        emoji: slot.control.emoji().map(str::to_string),
        style: slot.control.style().unwrap_or_default(),
        disabled: slot.disabled,
    }
}

fn render_menu(slot: &Slot, ctx: &dyn GuildContext) -> RenderedMenu {
    let (options, min_values, max_values) = match &slot.control {
        Control::Menu(def) => (
            def.options
                .iter()
                .map(|option| RenderedOption {
                    value: option.role_id.to_string(),
                    label: render_role_template(&option.label, option.role_id, ctx),
                    description: option
                        .description
                        .as_deref()
                        .map(|d| render_role_template(d, option.role_id, ctx)),
                    emoji: option.emoji.clone(),
                })
                .collect(),
            def.min_values,
            def.max_values,
        ),
        _ => (Vec::new(), 0, 0),
    };
    let placeholder = slot.control.render_label(ctx);
    RenderedMenu {
        custom_id: slot.custom_id.clone(),
        placeholder: (!placeholder.is_empty()).then_some(placeholder),
        min_values,
        max_values,
        options,
        disabled: slot.disabled,
    }
}

/// Platform-ready rendering of a live view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    /// Rows in display order
    pub rows: Vec<RenderedRow>,
}

impl RenderedView {
    /// Every button across rows.
    pub fn buttons(&self) -> impl Iterator<Item = &RenderedButton> {
        self.rows.iter().flat_map(|row| match row {
            RenderedRow::Buttons(buttons) => buttons.as_slice(),
            RenderedRow::Menu(_) => &[][..],
        })
    }

    /// Every menu across rows.
    pub fn menus(&self) -> impl Iterator<Item = &RenderedMenu> {
        self.rows.iter().filter_map(|row| match row {
            RenderedRow::Menu(menu) => Some(menu),
            RenderedRow::Buttons(_) => None,
        })
    }

    /// Rendered slots, the sum of button and menu costs.
    pub fn slot_count(&self) -> usize {
        self.buttons().count() * BUTTON_SLOTS + self.menus().count() * MENU_SLOTS
    }
}

/// One action row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedRow {
    /// Up to five buttons
    Buttons(Vec<RenderedButton>),
    /// A single select menu
    Menu(RenderedMenu),
}

/// Button as shown on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedButton {
    /// Custom id
    pub custom_id: String,
    /// Resolved label
    pub label: Option<String>,
    /// Emoji text
    pub emoji: Option<String>,
    /// Style
    pub style: ButtonStyle,
    /// Inert instance
    pub disabled: bool,
}

/// Select menu as shown on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    /// Custom id
    pub custom_id: String,
    /// Resolved placeholder
    pub placeholder: Option<String>,
    /// Minimum selections
    pub min_values: u8,
    /// Maximum selections
    pub max_values: u8,
    /// Options
    pub options: Vec<RenderedOption>,
    /// Inert instance
    pub disabled: bool,
}

/// One option of a rendered select menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOption {
    /// Role id as a string
    pub value: String,
    /// Resolved label
    pub label: String,
    /// Resolved description
    pub description: Option<String>,
    /// Emoji text
    pub emoji: Option<String>,
}
