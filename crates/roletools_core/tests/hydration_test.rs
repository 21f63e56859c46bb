//! Tests for registry hydration from persisted settings.

use roletools_core::{
    ButtonStyle, ChannelId, Control, ControlKind, GuildId, GuildSettings, GuildState, MenuDef,
    MenuOptionDef, MessageId, MessageKey, Registry, RoleButtonDef, RoleId,
};
use std::collections::{BTreeMap, BTreeSet};

const GUILD: GuildId = GuildId(1);

fn key(message: u64) -> MessageKey {
    MessageKey::new(ChannelId(7), MessageId(message))
}

fn button(name: &str, role: u64, messages: &[MessageKey]) -> Control {
    Control::Button(RoleButtonDef {
        name: name.to_string(),
        role_id: RoleId(role),
        label: "@{role}".to_string(),
        emoji: None,
        style: ButtonStyle::Primary,
        messages: messages.iter().copied().collect(),
    })
}

fn menu(name: &str, role: u64, messages: &[MessageKey]) -> Control {
    Control::Menu(MenuDef {
        name: name.to_string(),
        options: vec![MenuOptionDef {
            role_id: RoleId(role),
            label: "{role}".to_string(),
            description: None,
            emoji: None,
        }],
        placeholder: None,
        min_values: 0,
        max_values: 1,
        messages: messages.iter().copied().collect::<BTreeSet<_>>(),
    })
}

fn all(settings: GuildSettings) -> BTreeMap<GuildId, GuildSettings> {
    BTreeMap::from([(GUILD, settings)])
}

#[tokio::test]
async fn test_hydrate_builds_views_per_message() {
    let mut settings = GuildSettings::default();
    settings.put(button("a", 1, &[key(1), key(2)]));
    settings.put(menu("m", 10, &[key(1)]));

    let registry = Registry::new();
    let report = registry.hydrate(&all(settings)).await;
    assert_eq!(report.attached, 3);
    assert_eq!(report.failed, 0);

    let first = registry.view(GUILD, key(1)).await.unwrap();
    assert!(first.contains("a-1"));
    assert!(first.contains("m-10"));
    let second = registry.view(GUILD, key(2)).await.unwrap();
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn test_hydrate_is_idempotent() {
    let mut settings = GuildSettings::default();
    settings.put(button("a", 1, &[key(1)]));
    settings.put(button("b", 2, &[key(1)]));
    let settings = all(settings);

    let registry = Registry::new();
    registry.hydrate(&settings).await;
    let again = registry.hydrate(&settings).await;
    assert_eq!(again.attached, 0);
    assert_eq!(again.skipped, 2);

    let view = registry.view(GUILD, key(1)).await.unwrap();
    let mut ids: Vec<&str> = view.slots().iter().map(|slot| slot.custom_id()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a-1", "b-2"]);
}

#[tokio::test]
async fn test_hydrate_continues_past_placement_failures() {
    let mut settings = GuildSettings::default();
    // Buttons sort before menus, so the 21 buttons take five rows first.
    for i in 0..21 {
        settings.put(button(&format!("b{i:02}"), i, &[key(1)]));
    }
    settings.put(menu("late", 50, &[key(1), key(2)]));

    let registry = Registry::new();
    let report = registry.hydrate(&all(settings)).await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.attached, 22);

    let crowded = registry.view(GUILD, key(1)).await.unwrap();
    assert!(!crowded.contains("late-50"));
    let other = registry.view(GUILD, key(2)).await.unwrap();
    assert!(other.contains("late-50"));
}

#[tokio::test]
async fn test_guilds_are_independent_and_shutdown_clears() {
    let mut first = GuildSettings::default();
    first.put(button("a", 1, &[key(1)]));
    let mut second = GuildSettings::default();
    second.put(button("a", 1, &[key(1)]));
    let settings = BTreeMap::from([(GuildId(1), first), (GuildId(2), second)]);

    let registry = Registry::new();
    registry.hydrate(&settings).await;
    assert_eq!(registry.guild_ids().await, vec![GuildId(1), GuildId(2)]);

    registry.shutdown().await;
    assert!(registry.guild_ids().await.is_empty());
    assert!(registry.view(GuildId(1), key(1)).await.is_none());
}

#[tokio::test]
async fn test_hydrate_lays_out_buttons_before_menus_by_name() {
    let mut settings = GuildSettings::default();
    settings.put(menu("colors", 10, &[key(1)]));
    settings.put(button("zeta", 2, &[key(1)]));
    settings.put(button("alpha", 1, &[key(1)]));

    let registry = Registry::new();
    registry.hydrate(&all(settings)).await;

    let view = registry.view(GUILD, key(1)).await.unwrap();
    let layout: Vec<(&str, usize)> = view
        .slots()
        .iter()
        .map(|slot| (slot.custom_id(), slot.row()))
        .collect();
    assert_eq!(layout, vec![("alpha-1", 0), ("zeta-2", 0), ("colors-10", 1)]);
}

#[test]
fn test_resync_replaces_definitions_and_keeps_disabled_slots() {
    let mut settings = GuildSettings::default();
    settings.put(button("a", 1, &[key(1)]));
    settings.put(button("b", 2, &[key(1)]));
    settings.put(button("c", 3, &[key(1), key(2)]));

    let mut state = GuildState::default();
    state.attach_settings(GUILD, settings.clone());
    if let Some(view) = state.views.get_mut(&key(1)) {
        view.disable(&["a-1".to_string()]);
    }

    settings.remove(ControlKind::Button, "a");
    settings.put(Control::Button(RoleButtonDef {
        name: "b".to_string(),
        role_id: RoleId(2),
        label: "Renamed".to_string(),
        emoji: None,
        style: ButtonStyle::Danger,
        messages: BTreeSet::from([key(1)]),
    }));
    settings.put(button("c", 3, &[key(1)]));
    state.resync(GUILD, settings);

    let first = &state.views[&key(1)];
    assert!(first.get("a-1").unwrap().is_disabled());
    let b = first.get("b-2").unwrap();
    assert_eq!(b.control().style(), Some(ButtonStyle::Danger));
    assert_eq!(b.row(), 0);
    assert!(first.contains("c-3"));
    assert!(!state.views.contains_key(&key(2)), "view left empty is dropped");
}
