//! Discord bot client setup and lifecycle management.

use crate::{RoleToolsHandler, SerenityPlatform};
use roletools_core::{ConfigStore, RoleTools};
use roletools_error::{PlatformError, PlatformErrorKind};
use serenity::Client;
use std::sync::Arc;
use tracing::{info, instrument};

/// Gateway client serving role button activations.
///
/// # Example
/// ```no_run
/// use roletools_core::JsonFileStore;
/// use roletools_discord::RoleToolsBot;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let store = Arc::new(JsonFileStore::open("roletools.json").await?);
/// let mut bot = RoleToolsBot::new(&token, store).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct RoleToolsBot {
    client: Client,
    service: RoleTools,
}

impl RoleToolsBot {
    /// Build the gateway client and the service it dispatches to.
    ///
    /// # Errors
    /// Returns a transport error if the client cannot be built.
    #[instrument(skip(token, store), fields(token_len = token.len()))]
    pub async fn new(token: &str, store: Arc<dyn ConfigStore>) -> Result<Self, PlatformError> {
        info!("Initializing roletools Discord bot");
        let platform = Arc::new(SerenityPlatform::from_token(token));
        let service = RoleTools::new(store, platform);
        let handler = RoleToolsHandler::new(service.clone());
        let intents = RoleToolsHandler::intents();

        info!(?intents, "Building Serenity client");
        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::Transport(format!(
                    "Failed to build client: {e}"
                )))
            })?;
        Ok(Self { client, service })
    }

    /// Service shared with the event handler.
    pub fn service(&self) -> &RoleTools {
        &self.service
    }

    /// Run until the gateway connection ends.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), PlatformError> {
        info!("Starting Discord bot");
        let result = self.client.start().await;
        self.service.registry().shutdown().await;
        result.map_err(|e| PlatformError::new(PlatformErrorKind::Transport(format!("Client error: {e}"))))
    }
}
