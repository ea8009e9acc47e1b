//! The messaging gateway the moderation core talks through.
//!
//! The core never touches serenity directly; `discord::gateway` provides
//! the real implementation and tests use a recording fake.

use serenity::async_trait;
use tracing::{debug, warn};

use crate::common::error::{GatewayError, GatewayResult};

#[async_trait]
pub trait Gateway: Send + Sync {
    /// The bot's own user id.
    fn current_user_id(&self) -> String;

    async fn send_message(&self, channel_id: &str, content: &str) -> GatewayResult<()>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> GatewayResult<()>;

    /// Open (or reuse) the direct message channel with a user and return its id.
    async fn open_direct_channel(&self, user_id: &str) -> GatewayResult<String>;

    /// Whether the user holds "Manage Server" in the context of a channel.
    async fn user_has_manage_permission(
        &self,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
    ) -> GatewayResult<bool>;

    async fn user_exists_in_guild(&self, guild_id: &str, user_id: &str) -> GatewayResult<bool>;
}

/// Send a direct message, best effort.
///
/// Users who closed their DMs are skipped quietly; other failures are logged.
pub async fn send_private_message(gateway: &dyn Gateway, user_id: &str, content: &str) {
    let result = match gateway.open_direct_channel(user_id).await {
        Ok(channel_id) => gateway.send_message(&channel_id, content).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {}
        Err(GatewayError::RecipientUnavailable) => {
            debug!("User {} does not accept direct messages", user_id);
        }
        Err(e) => warn!("Failed to send direct message to {}: {}", user_id, e),
    }
}

/// Post to a channel, logging failures.
pub async fn send_channel_message(gateway: &dyn Gateway, channel_id: &str, content: &str) {
    if let Err(e) = gateway.send_message(channel_id, content).await {
        warn!("Failed to send message to channel {}: {}", channel_id, e);
    }
}

/// Delete a message, logging failures.
pub async fn delete_message(gateway: &dyn Gateway, channel_id: &str, message_id: &str) {
    if let Err(e) = gateway.delete_message(channel_id, message_id).await {
        warn!("Failed to delete message {} in {}: {}", message_id, channel_id, e);
    }
}
