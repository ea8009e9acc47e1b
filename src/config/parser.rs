//! Configuration file parsing and writing (JSON format).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::common::error::{ConfigError, PersistError};
use crate::config::types::Config;
use crate::moderation::persist::StateObserver;
use crate::moderation::state::StateSnapshot;

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_str(&content)
}

/// Load configuration from a JSON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

/// Write a template config the operator is expected to fill in.
pub fn write_default_config(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let bytes = to_pretty_json(&Config::default()).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;

    fs::write(path, bytes).map_err(|e| ConfigError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Serialize with four-space indentation.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Writes moderation state back into the config file after every change.
///
/// Holds the config as it was read from disk, so values injected through
/// environment overrides (the bot token in particular) never end up in the file.
pub struct JsonConfigStore {
    path: PathBuf,
    base: Config,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>, base: Config) -> Self {
        Self {
            path: path.into(),
            base,
        }
    }

    /// The config that would be written for the given state.
    pub fn merged(&self, snapshot: &StateSnapshot) -> Config {
        let mut config = self.base.clone();
        config.command_prefix = snapshot.command_prefix.clone();
        config.muted_channel_id = snapshot.muted_channel_id.clone().unwrap_or_default();
        config.muted_users = snapshot.muted_users.clone();
        config.max_muted_users = snapshot.max_muted_users;
        config
    }
}

impl StateObserver for JsonConfigStore {
    fn on_state_changed(&self, snapshot: &StateSnapshot) -> Result<(), PersistError> {
        let bytes = to_pretty_json(&self.merged(snapshot))?;
        fs::write(&self.path, bytes).map_err(|e| PersistError::Write {
            path: self.path.display().to_string(),
            source: e,
        })?;
        debug!("Saved moderation state to {}", self.path.display());
        Ok(())
    }
}
