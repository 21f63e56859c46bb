//! Tests for create, send, edit, delete and cleanup reconciliation.

mod test_utils;

use roletools_core::{
    ButtonStyle, ChannelId, ConfigStore, ControlKind, ControlRef, MAX_MESSAGE_CHARS,
    MenuOptionDef, MenuRequestBuilder, MessageId, MessageKey, RenderedRow, RoleId,
    ToggleRequestBuilder, UserId,
};
use roletools_error::{PlatformErrorKind, RoleToolsErrorKind};
use test_utils::*;

fn menu_request(name: &str, role: RoleId) -> roletools_core::MenuRequest {
    MenuRequestBuilder::default()
        .name(name)
        .options(vec![MenuOptionDef {
            role_id: role,
            label: "{role}".to_string(),
            description: None,
            emoji: None,
        }])
        .build()
        .expect("valid menu request")
}

#[tokio::test]
async fn test_create_then_send_records_message_key() {
    let (service, platform, store) = service();
    let preview = service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    assert!(preview.failed_fixes.is_empty());
    assert_eq!(preview.preview.buttons().count(), 1);
    assert_eq!(
        preview.preview.buttons().next().unwrap().label.as_deref(),
        Some("@Role 11")
    );

    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("role1")], Some("Pick"))
        .await
        .unwrap();
    assert_eq!(key.channel_id(), CHANNEL);

    let settings = store.guild_config(GUILD).await.unwrap();
    let control = settings.control(ControlKind::Button, "role1").unwrap();
    assert_eq!(control.messages().iter().copied().collect::<Vec<_>>(), vec![key]);

    let view = service.registry().view(GUILD, key).await.unwrap();
    assert!(view.contains("role1-11"));

    let content = platform.state().sent[0].content.clone();
    assert_eq!(content.as_deref(), Some("Pick"));

    let role = store.role_config(R1).await.unwrap();
    assert_eq!(role.buttons, vec!["role1".to_string()]);
}

#[tokio::test]
async fn test_restyle_propagates_and_keeps_messages() {
    let (service, platform, store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("role1")], None)
        .await
        .unwrap();

    let preview = service
        .create_button(GUILD, styled_button_request("role1", R1, ButtonStyle::Danger))
        .await
        .unwrap();
    assert!(preview.failed_fixes.is_empty());
    assert!(preview.control.messages().contains(&key));

    let view = service.registry().view(GUILD, key).await.unwrap();
    let slot = view.get("role1-11").unwrap();
    assert_eq!(slot.control().style(), Some(ButtonStyle::Danger));
    assert_eq!(view.len(), 1);

    let settings = store.guild_config(GUILD).await.unwrap();
    let control = settings.control(ControlKind::Button, "role1").unwrap();
    assert!(control.messages().contains(&key));
    assert_eq!(control.messages().len(), 1);

    let state = platform.state();
    let (edited, rendered) = state.edits.last().unwrap();
    assert_eq!(*edited, key);
    assert_eq!(rendered.buttons().next().unwrap().style, ButtonStyle::Danger);
}

#[tokio::test]
async fn test_redefine_on_other_role_resets_messages_and_moves_back_reference() {
    let (service, _platform, store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("role1")], None)
        .await
        .unwrap();

    let preview = service
        .create_button(GUILD, button_request("role1", R2))
        .await
        .unwrap();
    assert!(preview.control.messages().is_empty());
    assert!(store.role_config(R1).await.unwrap().buttons.is_empty());
    assert_eq!(
        store.role_config(R2).await.unwrap().buttons,
        vec!["role1".to_string()]
    );
}

#[tokio::test]
async fn test_create_rejects_unknown_role() {
    let (service, _platform, store) = service();
    let err = service
        .create_button(GUILD, button_request("ghost", RoleId(5)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(store.guild_config(GUILD).await.unwrap().buttons.is_empty());
}

#[tokio::test]
async fn test_failed_rerender_becomes_failed_fix() {
    let (service, platform, _store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("role1")], None)
        .await
        .unwrap();
    platform.state().edit_error = Some(PlatformErrorKind::Forbidden("Missing Access".into()));

    let preview = service
        .create_button(GUILD, styled_button_request("role1", R1, ButtonStyle::Success))
        .await
        .unwrap();
    assert_eq!(preview.failed_fixes.len(), 1);
    let failed = &preview.failed_fixes[0];
    assert_eq!(failed.message_key, key);
    assert_eq!(failed.reason, "Missing Access");
    assert!(failed.jump_url.ends_with(&format!("/{}/{}", CHANNEL, key.message_id())));
}

#[tokio::test]
async fn test_slot_budget_boundary() {
    let (service, platform, _store) = service();
    let mut refs = Vec::new();
    for i in 0..5 {
        let name = format!("b{i}");
        service
            .create_button(GUILD, button_request(&name, RoleId(20 + i)))
            .await
            .unwrap();
        refs.push(ControlRef::button(name));
    }
    for i in 0..5 {
        let name = format!("m{i}");
        service
            .create_menu(GUILD, menu_request(&name, RoleId(30 + i)))
            .await
            .unwrap();
        refs.push(ControlRef::menu(name));
    }

    let fits = service
        .send_controls_to_channel(GUILD, CHANNEL, &refs[..9], None)
        .await;
    assert!(fits.is_ok());
    assert_eq!(platform.sent_count(), 1);

    let err = service
        .send_controls_to_channel(GUILD, CHANNEL, &refs, None)
        .await
        .unwrap_err();
    match err.kind() {
        RoleToolsErrorKind::Capacity(capacity) => {
            assert_eq!(capacity.requested, 30);
            assert_eq!(capacity.limit, 25);
        }
        other => panic!("expected capacity error, got {other}"),
    }
    assert_eq!(platform.sent_count(), 1);
}

#[tokio::test]
async fn test_send_collapses_duplicates_and_truncates_text() {
    let (service, platform, _store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let refs = [ControlRef::button("role1"), ControlRef::button("Role1")];
    let long = "x".repeat(MAX_MESSAGE_CHARS + 50);
    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &refs, Some(&long))
        .await
        .unwrap();

    let view = service.registry().view(GUILD, key).await.unwrap();
    assert_eq!(view.len(), 1);
    let state = platform.state();
    assert_eq!(
        state.sent[0].content.as_ref().map(|c| c.len()),
        Some(MAX_MESSAGE_CHARS)
    );
}

#[tokio::test]
async fn test_send_unknown_control_is_validation_error() {
    let (service, platform, _store) = service();
    let err = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("missing")], None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(platform.sent_count(), 0);
}

#[tokio::test]
async fn test_edit_requires_bot_authorship() {
    let (service, platform, _store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let foreign = MessageKey::new(CHANNEL, MessageId(77));
    platform.add_message(foreign, UserId(5));

    let err = service
        .edit_message_controls(GUILD, CHANNEL, MessageId(77), &[ControlRef::button("role1")])
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(platform.state().edits.is_empty());
}

#[tokio::test]
async fn test_edit_releases_previous_controls() {
    let (service, _platform, store) = service();
    service
        .create_button(GUILD, button_request("old", R1))
        .await
        .unwrap();
    service
        .create_button(GUILD, button_request("new", R2))
        .await
        .unwrap();
    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("old")], None)
        .await
        .unwrap();

    let outcome = service
        .edit_message_controls(GUILD, key.channel_id(), key.message_id(), &[ControlRef::button("new")])
        .await
        .unwrap();
    assert!(outcome.is_rendered());

    let settings = store.guild_config(GUILD).await.unwrap();
    let old = settings.control(ControlKind::Button, "old").unwrap();
    let new = settings.control(ControlKind::Button, "new").unwrap();
    assert!(old.messages().is_empty());
    assert!(new.messages().contains(&key));

    let view = service.registry().view(GUILD, key).await.unwrap();
    assert!(view.contains("new-12"));
    assert!(!view.contains("old-11"));
}

#[tokio::test]
async fn test_edit_failure_still_updates_index() {
    let (service, platform, store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let key = MessageKey::new(CHANNEL, MessageId(88));
    platform.add_message(key, BOT);
    platform.state().edit_error = Some(PlatformErrorKind::Http {
        status: 400,
        reason: "Invalid Form Body".into(),
    });

    let outcome = service
        .edit_message_controls(GUILD, CHANNEL, MessageId(88), &[ControlRef::button("role1")])
        .await
        .unwrap();
    assert_eq!(outcome.edit_failure.as_deref(), Some("Invalid Form Body"));

    let settings = store.guild_config(GUILD).await.unwrap();
    let control = settings.control(ControlKind::Button, "role1").unwrap();
    assert!(control.messages().contains(&key));
    assert!(service.registry().view(GUILD, key).await.is_some());
}

#[tokio::test]
async fn test_delete_disables_but_keeps_slots() {
    let (service, platform, store) = service();
    let toggle = ToggleRequestBuilder::default()
        .name("fanclub")
        .role1_id(R1)
        .role2_id(R2)
        .build()
        .unwrap();
    service.create_toggle(GUILD, toggle).await.unwrap();
    service
        .create_button(GUILD, button_request("other", R3))
        .await
        .unwrap();
    let refs = [ControlRef::button("fanclub"), ControlRef::button("other")];
    let first = service
        .send_controls_to_channel(GUILD, CHANNEL, &refs, None)
        .await
        .unwrap();
    let second = service
        .send_controls_to_channel(GUILD, ChannelId(501), &refs[..1], None)
        .await
        .unwrap();

    let summary = service
        .delete_control(GUILD, ControlRef::button("FanClub"))
        .await
        .unwrap();
    assert_eq!(summary.disabled, 2);
    assert_eq!(summary.views_touched, 2);
    assert!(summary.failed_fixes.is_empty());

    for key in [first, second] {
        let view = service.registry().view(GUILD, key).await.unwrap();
        let slot = view.get("fanclub-11").unwrap();
        assert!(slot.is_disabled());
    }
    let view = service.registry().view(GUILD, first).await.unwrap();
    assert_eq!(view.len(), 2);
    assert!(!view.get("other-13").unwrap().is_disabled());

    let settings = store.guild_config(GUILD).await.unwrap();
    assert!(settings.control(ControlKind::Button, "fanclub").is_none());
    assert!(store.role_config(R1).await.unwrap().buttons.is_empty());
    assert!(store.role_config(R2).await.unwrap().buttons.is_empty());

    let state = platform.state();
    let (_, rendered) = state.edits.iter().find(|(key, _)| *key == first).unwrap();
    match &rendered.rows[0] {
        RenderedRow::Buttons(buttons) => {
            assert!(buttons[0].disabled);
            assert!(!buttons[1].disabled);
        }
        RenderedRow::Menu(_) => panic!("expected a button row"),
    }
}

#[tokio::test]
async fn test_delete_unknown_control_fails() {
    let (service, _platform, _store) = service();
    let err = service
        .delete_control(GUILD, ControlRef::menu("nothing"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_cleanup_keeps_forbidden_and_drops_confirmed_missing() {
    let (service, platform, store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    let refs = [ControlRef::button("role1")];
    let mut keys = Vec::new();
    for channel in [500, 501, 502, 503, 504] {
        keys.push(
            service
                .send_controls_to_channel(GUILD, ChannelId(channel), &refs, None)
                .await
                .unwrap(),
        );
    }
    let (present, not_found, forbidden, no_channel, transport) =
        (keys[0], keys[1], keys[2], keys[3], keys[4]);
    platform.fail_fetch(not_found, PlatformErrorKind::NotFound("Unknown Message".into()));
    platform.fail_fetch(forbidden, PlatformErrorKind::Forbidden("Missing Access".into()));
    platform.fail_fetch(transport, PlatformErrorKind::Transport("timed out".into()));
    platform
        .state()
        .missing_channels
        .insert(no_channel.channel_id());

    let summary = service.cleanup_stale_references(GUILD).await.unwrap();
    assert_eq!(summary.checked, 5);
    assert_eq!(summary.removed, 2);
    assert_eq!(summary.inconclusive, 2);
    assert_eq!(summary.views_dropped, 2);

    let settings = store.guild_config(GUILD).await.unwrap();
    let messages = settings
        .control(ControlKind::Button, "role1")
        .unwrap()
        .messages()
        .clone();
    assert!(messages.contains(&present));
    assert!(messages.contains(&forbidden));
    assert!(messages.contains(&transport));
    assert!(!messages.contains(&not_found));
    assert!(!messages.contains(&no_channel));
    assert!(service.registry().view(GUILD, not_found).await.is_none());

    let again = service.cleanup_stale_references(GUILD).await.unwrap();
    assert_eq!(again.removed, 0);
}

#[tokio::test]
async fn test_list_controls_reports_jump_links() {
    let (service, _platform, _store) = service();
    service
        .create_button(GUILD, button_request("role1", R1))
        .await
        .unwrap();
    service
        .create_menu(GUILD, menu_request("colors", R2))
        .await
        .unwrap();
    let key = service
        .send_controls_to_channel(GUILD, CHANNEL, &[ControlRef::button("role1")], None)
        .await
        .unwrap();

    let listing = service.list_controls(GUILD).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name, "role1");
    assert_eq!(listing[0].style, Some(ButtonStyle::Primary));
    assert_eq!(listing[0].jump_urls, vec![key.jump_url(GUILD)]);
    assert_eq!(listing[1].kind, ControlKind::Menu);
    assert_eq!(listing[1].custom_id, "colors-12");
    assert!(listing[1].jump_urls.is_empty());
}
