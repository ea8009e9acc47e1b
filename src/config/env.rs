//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `TENHUNDRED_CONFIG` - Path of the JSON config file
//! - `TENHUNDRED_BOT_TOKEN` - Discord bot token
//! - `TENHUNDRED_SERVER_ID` - Server the bot operates on

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "TENHUNDRED";

/// Config file used when `TENHUNDRED_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Apply environment variable overrides to a config.
///
/// This allows the bot token to be provided via the environment
/// instead of sitting in the config file.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |name| env::var(name).ok())
}

fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(token) = lookup(&format!("{}_BOT_TOKEN", ENV_PREFIX)) {
        if !token.is_empty() {
            config.bot_token = token;
        }
    }

    if let Some(server_id) = lookup(&format!("{}_SERVER_ID", ENV_PREFIX)) {
        if !server_id.is_empty() {
            config.server_id = server_id;
        }
    }

    config
}

/// Get the config file path from environment or use default.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
