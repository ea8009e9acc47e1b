//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use std::collections::HashSet;

use tracing::warn;

use crate::common::error::ConfigError;
use crate::config::types::{AuthorizationMode, Config};

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.bot_token.is_empty() {
        errors.push("botToken is required".to_string());
    }
    if config.server_id.is_empty() {
        errors.push("serverID is required".to_string());
    }
    if config.words_file.is_empty() {
        errors.push("wordsFile is required".to_string());
    }

    if config.command_prefix.is_empty() {
        errors.push("commandPrefix must not be empty".to_string());
    } else if config.command_prefix.contains(char::is_whitespace) {
        errors.push(format!(
            "commandPrefix '{}' must not contain whitespace",
            config.command_prefix
        ));
    }

    if config.authorization == AuthorizationMode::AdminList && config.admins.is_empty() {
        errors.push("authorization is 'adminList' but admins is empty".to_string());
    }

    let mut seen = HashSet::new();
    for user in &config.muted_users {
        if !seen.insert(user) {
            warn!("mutedUsers lists {} more than once; keeping the first entry", user);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
