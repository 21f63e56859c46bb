//! Roletools CLI binary.
//!
//! This binary provides command-line access to roletools:
//! - Run the bot and serve role button activations
//! - Create, delete and list role buttons and menus
//! - Post or edit messages carrying controls
//! - Drop references to deleted messages

use clap::Parser;
use roletools::{RoleToolsConfig, observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, execute};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = RoleToolsConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let logging = if cli.verbose {
        config.logging().clone().with_level("debug")
    } else {
        config.logging().clone()
    };
    observability::init_logging(&logging)?;

    // Execute the requested command
    execute(cli.command, &config).await?;
    Ok(())
}
