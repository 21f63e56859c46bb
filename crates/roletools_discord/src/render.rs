//! Rendering of live views into serenity component builders.

use roletools_core::{ButtonStyle, RenderedButton, RenderedMenu, RenderedRow, RenderedView};
use serenity::all::{
    ButtonStyle as SerenityButtonStyle, CreateActionRow, CreateButton, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EmojiId, ReactionType,
};

/// Action rows for a rendered view, in display order.
pub fn action_rows(view: &RenderedView) -> Vec<CreateActionRow> {
    view.rows
        .iter()
        .map(|row| match row {
            RenderedRow::Buttons(buttons) => {
                CreateActionRow::Buttons(buttons.iter().map(button).collect())
            }
            RenderedRow::Menu(menu) => CreateActionRow::SelectMenu(select_menu(menu)),
        })
        .collect()
}

fn button(rendered: &RenderedButton) -> CreateButton {
    let mut button = CreateButton::new(&rendered.custom_id)
        .style(style(rendered.style))
        .disabled(rendered.disabled);
    if let Some(label) = &rendered.label {
        button = button.label(label);
    }
    if let Some(emoji) = rendered.emoji.as_deref().and_then(parse_emoji) {
        button = button.emoji(emoji);
    }
    button
}

fn select_menu(rendered: &RenderedMenu) -> CreateSelectMenu {
    let options = rendered
        .options
        .iter()
        .map(|option| {
            let mut built = CreateSelectMenuOption::new(&option.label, &option.value);
            if let Some(description) = &option.description {
                built = built.description(description);
            }
            if let Some(emoji) = option.emoji.as_deref().and_then(parse_emoji) {
                built = built.emoji(emoji);
            }
            built
        })
        .collect();
    let mut menu = CreateSelectMenu::new(&rendered.custom_id, CreateSelectMenuKind::String { options })
        .min_values(rendered.min_values)
        .max_values(rendered.max_values)
        .disabled(rendered.disabled);
    if let Some(placeholder) = &rendered.placeholder {
        menu = menu.placeholder(placeholder);
    }
    menu
}

fn style(style: ButtonStyle) -> SerenityButtonStyle {
    match style {
        ButtonStyle::Primary => SerenityButtonStyle::Primary,
        ButtonStyle::Secondary => SerenityButtonStyle::Secondary,
        ButtonStyle::Success => SerenityButtonStyle::Success,
        ButtonStyle::Danger => SerenityButtonStyle::Danger,
    }
}

/// Parse a stored emoji.
///
/// Accepts `name:id`, `a:name:id`, the mention forms `<:name:id>` and
/// `<a:name:id>`, and plain unicode. Returns `None` for blank text.
///
/// # Examples
///
/// ```
/// use roletools_discord::parse_emoji;
/// use serenity::all::ReactionType;
///
/// assert_eq!(parse_emoji("😀"), Some(ReactionType::Unicode("😀".to_string())));
/// assert!(matches!(
///     parse_emoji("a:party:123"),
///     Some(ReactionType::Custom { animated: true, .. })
/// ));
/// ```
pub fn parse_emoji(text: &str) -> Option<ReactionType> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let bare = text
        .strip_prefix('<')
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(text);
    let parts: Vec<&str> = bare.split(':').collect();
    let custom = match parts.as_slice() {
        ["a", name, id] => Some((true, *name, *id)),
        ["", name, id] | [name, id] => Some((false, *name, *id)),
        _ => None,
    };
    let custom = custom.and_then(|(animated, name, id)| {
        id.parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(|id| (animated, name, id))
    });
    if let Some((animated, name, id)) = custom {
        return Some(ReactionType::Custom {
            animated,
            id: EmojiId::new(id),
            name: Some(name.to_string()),
        });
    }
    Some(ReactionType::Unicode(text.to_string()))
}
