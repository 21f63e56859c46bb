//! CLI command definitions.

use clap::{Parser, Subcommand};
use roletools::{ButtonStyle, ChannelId, GuildId, MenuOptionDef, MessageId, RoleId, ValidationError};
use std::path::PathBuf;
use std::str::FromStr;

/// Roletools - persistent role buttons and role menus for Discord
#[derive(Parser, Debug)]
#[command(name = "roletools")]
#[command(about = "Persistent role buttons and role menus for Discord", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./roletools.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the gateway and serve role activations
    Run,

    /// Role button commands
    #[command(subcommand)]
    Button(ButtonCommands),

    /// Role menu commands
    #[command(subcommand)]
    Menu(MenuCommands),

    /// Print every control of a guild
    View {
        /// Guild id
        guild: GuildId,
    },

    /// Message commands
    #[command(subcommand)]
    Message(MessageCommands),

    /// Drop references to messages that no longer exist
    Cleanup {
        /// Guild id
        guild: GuildId,
    },
}

/// Role button subcommands
#[derive(Subcommand, Debug)]
pub enum ButtonCommands {
    /// Create or redefine a single-role button
    Create {
        /// Guild id
        guild: GuildId,
        /// Button name
        name: String,
        /// Role granted by the button
        role: RoleId,
        /// Label template (`{role}` and `{count}` are replaced)
        #[arg(long)]
        label: Option<String>,
        /// Unicode emoji or `name:id`
        #[arg(long)]
        emoji: Option<String>,
        /// primary, secondary, success, danger or a color alias
        #[arg(long, default_value = "primary")]
        style: ButtonStyle,
    },

    /// Create or redefine a toggle button between two roles
    Toggle {
        /// Guild id
        guild: GuildId,
        /// Button name
        name: String,
        /// Preferred role
        role1: RoleId,
        /// Alternate role
        role2: RoleId,
        /// Label template (`{role1}` and `{role2}` are replaced)
        #[arg(long)]
        label: Option<String>,
        /// Unicode emoji or `name:id`
        #[arg(long)]
        emoji: Option<String>,
        /// primary, secondary, success, danger or a color alias
        #[arg(long, default_value = "secondary")]
        style: ButtonStyle,
    },

    /// Delete a button and disable it everywhere it is shown
    Delete {
        /// Guild id
        guild: GuildId,
        /// Button name
        name: String,
    },
}

/// Role menu subcommands
#[derive(Subcommand, Debug)]
pub enum MenuCommands {
    /// Create or redefine a select menu
    Create {
        /// Guild id
        guild: GuildId,
        /// Menu name
        name: String,
        /// Option as ROLE[:LABEL[:DESCRIPTION]], repeatable
        #[arg(long = "option", required = true)]
        options: Vec<MenuOptionArg>,
        /// Placeholder text
        #[arg(long)]
        placeholder: Option<String>,
        /// Minimum selections
        #[arg(long)]
        min: Option<u8>,
        /// Maximum selections
        #[arg(long)]
        max: Option<u8>,
    },

    /// Delete a menu and disable it everywhere it is shown
    Delete {
        /// Guild id
        guild: GuildId,
        /// Menu name
        name: String,
    },
}

/// Message subcommands
#[derive(Subcommand, Debug)]
pub enum MessageCommands {
    /// Post a new message carrying controls
    Send {
        /// Guild id
        guild: GuildId,
        /// Channel to post in
        channel: ChannelId,
        /// Button to include, repeatable
        #[arg(long = "button")]
        buttons: Vec<String>,
        /// Menu to include, repeatable
        #[arg(long = "menu")]
        menus: Vec<String>,
        /// Message text
        #[arg(long)]
        text: Option<String>,
    },

    /// Replace the controls on a message the bot posted
    Edit {
        /// Guild id
        guild: GuildId,
        /// Channel of the message
        channel: ChannelId,
        /// Message id
        message: MessageId,
        /// Button to include, repeatable
        #[arg(long = "button")]
        buttons: Vec<String>,
        /// Menu to include, repeatable
        #[arg(long = "menu")]
        menus: Vec<String>,
    },
}

/// Menu option given on the command line as `ROLE[:LABEL[:DESCRIPTION]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptionArg(pub MenuOptionDef);

impl FromStr for MenuOptionArg {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let role_id: RoleId = parts.next().unwrap_or_default().parse()?;
        let label = parts
            .next()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or("{role}")
            .to_string();
        let description = parts
            .next()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(str::to_string);
        Ok(Self(MenuOptionDef {
            role_id,
            label,
            description,
            emoji: None,
        }))
    }
}
