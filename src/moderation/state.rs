//! Moderation state: who and where the word restriction applies.
//!
//! Owned by the dispatcher and only mutated under its lock. Every
//! mutator either changes state and returns `Ok`, or leaves it
//! untouched and returns the reason as a `ModerationError`.

use std::collections::HashSet;

use crate::common::error::ModerationError;
use crate::config::types::Config;

/// Serializable copy of the mutable part of the state, handed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub muted_users: Vec<String>,
    pub muted_channel_id: Option<String>,
    pub command_prefix: String,
    pub max_muted_users: usize,
}

#[derive(Debug, Clone)]
pub struct ModerationState {
    /// Oldest first; no duplicates.
    muted_users: Vec<String>,
    muted_channel_id: Option<String>,
    /// Never empty.
    command_prefix: String,
    server_id: String,
    max_muted_users: usize,
}

impl ModerationState {
    pub fn new(
        server_id: impl Into<String>,
        command_prefix: impl Into<String>,
        max_muted_users: usize,
    ) -> Self {
        Self {
            muted_users: Vec::new(),
            muted_channel_id: None,
            command_prefix: command_prefix.into(),
            server_id: server_id.into(),
            max_muted_users,
        }
    }

    /// Restore state from the persisted config. Duplicate muted ids are collapsed.
    pub fn from_config(config: &Config) -> Self {
        let mut seen = HashSet::new();
        let muted_users = config
            .muted_users
            .iter()
            .filter(|user| seen.insert(user.as_str()))
            .cloned()
            .collect();

        Self {
            muted_users,
            muted_channel_id: config.muted_channel().map(str::to_string),
            command_prefix: config.command_prefix.clone(),
            server_id: config.server_id.clone(),
            max_muted_users: config.effective_max_muted_users(),
        }
    }

    pub fn muted_users(&self) -> &[String] {
        &self.muted_users
    }

    pub fn muted_channel_id(&self) -> Option<&str> {
        self.muted_channel_id.as_deref()
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn max_muted_users(&self) -> usize {
        self.max_muted_users
    }

    pub fn is_muted(&self, user_id: &str) -> bool {
        self.muted_users.iter().any(|user| user == user_id)
    }

    pub fn is_muted_channel(&self, channel_id: &str) -> bool {
        self.muted_channel_id.as_deref() == Some(channel_id)
    }

    pub fn is_full(&self) -> bool {
        self.muted_users.len() >= self.max_muted_users
    }

    /// Append a user to the muted list.
    ///
    /// The limit is checked before the duplicate check, so a full list
    /// reports `CapacityReached` even for a user already on it.
    pub fn mute(&mut self, user_id: &str) -> Result<(), ModerationError> {
        if self.is_full() {
            return Err(ModerationError::CapacityReached {
                current: self.muted_users.len(),
                max: self.max_muted_users,
            });
        }
        if self.is_muted(user_id) {
            return Err(ModerationError::AlreadyMuted(user_id.to_string()));
        }
        self.muted_users.push(user_id.to_string());
        Ok(())
    }

    pub fn unmute(&mut self, user_id: &str) -> Result<(), ModerationError> {
        match self.muted_users.iter().position(|user| user == user_id) {
            Some(index) => {
                self.muted_users.remove(index);
                Ok(())
            }
            None => Err(ModerationError::NotMuted(user_id.to_string())),
        }
    }

    pub fn set_muted_channel(&mut self, channel_id: &str) -> Result<(), ModerationError> {
        if self.is_muted_channel(channel_id) {
            return Err(ModerationError::ChannelAlreadySet(channel_id.to_string()));
        }
        self.muted_channel_id = Some(channel_id.to_string());
        Ok(())
    }

    pub fn clear_muted_channel(&mut self) -> Result<(), ModerationError> {
        match self.muted_channel_id.take() {
            Some(_) => Ok(()),
            None => Err(ModerationError::NoChannelSet),
        }
    }

    pub fn set_command_prefix(&mut self, prefix: &str) -> Result<(), ModerationError> {
        if prefix.is_empty() {
            return Err(ModerationError::EmptyPrefix);
        }
        if prefix.contains(char::is_whitespace) {
            return Err(ModerationError::PrefixWhitespace(prefix.to_string()));
        }
        self.command_prefix = prefix.to_string();
        Ok(())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            muted_users: self.muted_users.clone(),
            muted_channel_id: self.muted_channel_id.clone(),
            command_prefix: self.command_prefix.clone(),
            max_muted_users: self.max_muted_users,
        }
    }
}
