//! Who may run moderation commands.

use std::collections::HashSet;

use serenity::async_trait;
use tracing::warn;

use crate::config::types::{AuthorizationMode, Config};
use crate::moderation::gateway::Gateway;

#[async_trait]
pub trait AuthorizationPolicy: Send + Sync {
    async fn is_authorized(
        &self,
        gateway: &dyn Gateway,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
    ) -> bool;
}

/// Anyone holding "Manage Server" may run commands.
#[derive(Debug, Default)]
pub struct ManageServerPolicy;

#[async_trait]
impl AuthorizationPolicy for ManageServerPolicy {
    async fn is_authorized(
        &self,
        gateway: &dyn Gateway,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
    ) -> bool {
        match gateway
            .user_has_manage_permission(guild_id, channel_id, user_id)
            .await
        {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!("Permission check for {} failed: {}", user_id, e);
                false
            }
        }
    }
}

/// Only explicitly listed users may run commands.
#[derive(Debug, Default)]
pub struct AdminListPolicy {
    admins: HashSet<String>,
}

impl AdminListPolicy {
    pub fn new(admins: impl IntoIterator<Item = String>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AuthorizationPolicy for AdminListPolicy {
    async fn is_authorized(
        &self,
        _gateway: &dyn Gateway,
        _guild_id: &str,
        _channel_id: &str,
        user_id: &str,
    ) -> bool {
        self.admins.contains(user_id)
    }
}

/// Pick the policy the config asks for.
pub fn policy_from_config(config: &Config) -> Box<dyn AuthorizationPolicy> {
    match config.authorization {
        AuthorizationMode::ManageServer => Box::new(ManageServerPolicy),
        AuthorizationMode::AdminList => Box::new(AdminListPolicy::new(config.admins.clone())),
    }
}
