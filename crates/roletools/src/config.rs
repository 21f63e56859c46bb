//! Application configuration.
//!
//! Sources, lowest precedence first:
//! 1. Bundled defaults (`roletools.toml` shipped with the crate)
//! 2. `~/.config/roletools/roletools.toml`
//! 3. `./roletools.toml`, or the file passed with `--config` (then required)
//! 4. `ROLETOOLS_*` environment variables, `__` between sections
//!
//! The bot token additionally falls back to `DISCORD_TOKEN`.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use roletools_error::{ConfigError, RoleToolsResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG: &str = include_str!("../roletools.toml");

/// Discord connection settings.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct DiscordConfig {
    /// Bot token
    #[serde(default)]
    token: Option<String>,
}

/// Persisted store settings.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct StoreConfig {
    /// Path of the JSON store file
    path: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    level: String,
    /// Emit JSON lines instead of text
    #[serde(default)]
    json: bool,
}

impl LoggingConfig {
    /// Same settings with a different level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Complete roletools configuration.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct RoleToolsConfig {
    /// Discord settings
    #[serde(default)]
    discord: DiscordConfig,
    /// Store settings
    store: StoreConfig,
    /// Logging settings
    logging: LoggingConfig,
}

impl RoleToolsConfig {
    /// Load configuration from every source.
    ///
    /// # Errors
    /// Returns a `ConfigError` if an explicit file is missing or any source
    /// cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> RoleToolsResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/roletools/roletools.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match explicit {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name("roletools").required(false)),
        };

        builder = builder.add_source(Environment::with_prefix("ROLETOOLS").separator("__"));

        let mut config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")))?;

        if config.discord.token.is_none() {
            config.discord.token = std::env::var("DISCORD_TOKEN").ok();
        }
        Ok(config)
    }

    /// Configuration from a TOML document layered over the bundled defaults.
    pub fn from_toml(document: &str) -> RoleToolsResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// The bot token, required by every command that talks to Discord.
    pub fn require_token(&self) -> RoleToolsResult<&str> {
        self.discord
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::new("No Discord token: set discord.token or DISCORD_TOKEN").into()
            })
    }
}
