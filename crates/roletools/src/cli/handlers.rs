//! Command handlers.
//!
//! Every command except `run` opens the JSON store, hydrates the registry,
//! performs one operation and prints a summary.

use super::commands::{ButtonCommands, Commands, MenuCommands, MessageCommands};
use roletools::{
    ButtonRequestBuilder, ControlPreview, ControlRef, FailedFix, GuildId, HydrationReport,
    JsonFileStore, MenuRequestBuilder, RoleTools, RoleToolsBot, RoleToolsConfig,
    RoleToolsResult, SerenityPlatform, ToggleRequestBuilder, ValidationError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Execute a parsed command.
pub async fn execute(command: Commands, config: &RoleToolsConfig) -> RoleToolsResult<()> {
    match command {
        Commands::Run => run_bot(config).await,
        Commands::Button(cmd) => handle_button_command(cmd, config).await,
        Commands::Menu(cmd) => handle_menu_command(cmd, config).await,
        Commands::View { guild } => {
            let service = connect(config).await?;
            let listing = service.list_controls(guild).await?;
            if listing.is_empty() {
                println!("No role controls in guild {guild}.");
                return Ok(());
            }
            println!("{:-<80}", "");
            for control in &listing {
                let roles: Vec<String> = control.role_ids.iter().map(|r| r.mention()).collect();
                println!("{} {} ({})", control.kind, control.name, control.custom_id);
                println!("  roles: {}", roles.join(", "));
                println!("  label: {}", control.label);
                if let Some(style) = control.style {
                    println!("  style: {style} ({})", style.color_name());
                }
                if let Some(emoji) = &control.emoji {
                    println!("  emoji: {emoji}");
                }
                for url in &control.jump_urls {
                    println!("  shown on: {url}");
                }
                println!("{:-<80}", "");
            }
            println!("Total: {} controls", listing.len());
            Ok(())
        }
        Commands::Message(cmd) => handle_message_command(cmd, config).await,
        Commands::Cleanup { guild } => {
            let service = connect(config).await?;
            let summary = service.cleanup_stale_references(guild).await?;
            println!(
                "Checked {} messages, removed {} references, kept {} that could not be verified.",
                summary.checked, summary.removed, summary.inconclusive
            );
            Ok(())
        }
    }
}

async fn handle_button_command(
    cmd: ButtonCommands,
    config: &RoleToolsConfig,
) -> RoleToolsResult<()> {
    match cmd {
        ButtonCommands::Create {
            guild,
            name,
            role,
            label,
            emoji,
            style,
        } => {
            let mut builder = ButtonRequestBuilder::default();
            builder.name(name).role_id(role).style(style);
            if let Some(label) = label {
                builder.label(label);
            }
            if let Some(emoji) = emoji {
                builder.emoji(emoji);
            }
            let request = builder.build().map_err(builder_error)?;
            let service = connect(config).await?;
            let preview = service.create_button(guild, request).await?;
            print_preview(&preview);
            Ok(())
        }
        ButtonCommands::Toggle {
            guild,
            name,
            role1,
            role2,
            label,
            emoji,
            style,
        } => {
            let mut builder = ToggleRequestBuilder::default();
            builder.name(name).role1_id(role1).role2_id(role2).style(style);
            if let Some(label) = label {
                builder.label(label);
            }
            if let Some(emoji) = emoji {
                builder.emoji(emoji);
            }
            let request = builder.build().map_err(builder_error)?;
            let service = connect(config).await?;
            let preview = service.create_toggle(guild, request).await?;
            print_preview(&preview);
            Ok(())
        }
        ButtonCommands::Delete { guild, name } => {
            delete(config, guild, ControlRef::button(name)).await
        }
    }
}

async fn handle_menu_command(cmd: MenuCommands, config: &RoleToolsConfig) -> RoleToolsResult<()> {
    match cmd {
        MenuCommands::Create {
            guild,
            name,
            options,
            placeholder,
            min,
            max,
        } => {
            let mut builder = MenuRequestBuilder::default();
            builder
                .name(name)
                .options(options.into_iter().map(|option| option.0).collect());
            if let Some(placeholder) = placeholder {
                builder.placeholder(placeholder);
            }
            if let Some(min) = min {
                builder.min_values(min);
            }
            if let Some(max) = max {
                builder.max_values(max);
            }
            let request = builder.build().map_err(builder_error)?;
            let service = connect(config).await?;
            let preview = service.create_menu(guild, request).await?;
            print_preview(&preview);
            Ok(())
        }
        MenuCommands::Delete { guild, name } => delete(config, guild, ControlRef::menu(name)).await,
    }
}

async fn handle_message_command(
    cmd: MessageCommands,
    config: &RoleToolsConfig,
) -> RoleToolsResult<()> {
    match cmd {
        MessageCommands::Send {
            guild,
            channel,
            buttons,
            menus,
            text,
        } => {
            let service = connect(config).await?;
            let refs = control_refs(buttons, menus);
            let key = service
                .send_controls_to_channel(guild, channel, &refs, text.as_deref())
                .await?;
            println!("Sent {} controls: {}", refs.len(), key.jump_url(guild));
            Ok(())
        }
        MessageCommands::Edit {
            guild,
            channel,
            message,
            buttons,
            menus,
        } => {
            let service = connect(config).await?;
            let refs = control_refs(buttons, menus);
            let outcome = service
                .edit_message_controls(guild, channel, message, &refs)
                .await?;
            let url = outcome.message_key.jump_url(guild);
            match &outcome.edit_failure {
                None => println!("Updated {url}"),
                Some(reason) => {
                    println!("Saved the new controls for {url}, but the message could not be edited: {reason}")
                }
            }
            Ok(())
        }
    }
}

async fn run_bot(config: &RoleToolsConfig) -> RoleToolsResult<()> {
    let token = config.require_token()?;
    let store = Arc::new(JsonFileStore::open(config.store().path()).await?);
    let mut bot = RoleToolsBot::new(token, store).await?;
    bot.start().await?;
    Ok(())
}

async fn delete(
    config: &RoleToolsConfig,
    guild: GuildId,
    control: ControlRef,
) -> RoleToolsResult<()> {
    let service = connect(config).await?;
    let summary = service.delete_control(guild, control).await?;
    println!(
        "Deleted {} {}; disabled {} instances on {} messages.",
        summary.control.kind(),
        summary.control.name(),
        summary.disabled,
        summary.views_touched
    );
    print_failed_fixes(&summary.failed_fixes);
    Ok(())
}

/// Service over the configured store and a REST-only platform client.
async fn connect(config: &RoleToolsConfig) -> RoleToolsResult<RoleTools> {
    let token = config.require_token()?;
    let store = Arc::new(JsonFileStore::open(config.store().path()).await?);
    let platform = Arc::new(SerenityPlatform::from_token(token));
    let service = RoleTools::new(store, platform);
    let report: HydrationReport = service.initialize_controls().await?;
    info!(
        attached = report.attached,
        skipped = report.skipped,
        failed = report.failed,
        "Registry hydrated"
    );
    if report.failed > 0 {
        warn!(failed = report.failed, "Some stored controls could not be attached");
    }
    Ok(service)
}

fn control_refs(buttons: Vec<String>, menus: Vec<String>) -> Vec<ControlRef> {
    buttons
        .into_iter()
        .map(ControlRef::button)
        .chain(menus.into_iter().map(ControlRef::menu))
        .collect()
}

fn print_preview(preview: &ControlPreview) {
    let control = &preview.control;
    println!("Saved {} {} ({})", control.kind(), control.name(), control.custom_id());
    let messages = control.messages().len();
    if messages > 0 {
        println!("Shown on {messages} messages.");
    }
    print_failed_fixes(&preview.failed_fixes);
}

fn print_failed_fixes(failed: &[FailedFix]) {
    if failed.is_empty() {
        return;
    }
    println!("Could not update {} messages:", failed.len());
    for fix in failed {
        println!("  {} ({})", fix.jump_url, fix.reason);
    }
}

fn builder_error(err: impl std::fmt::Display) -> ValidationError {
    ValidationError::new(format!("Incomplete request: {err}"))
}
