//! Test doubles for the gateway and the persistence hook.

use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serenity::async_trait;

use crate::common::error::{GatewayError, GatewayResult, PersistError};
use crate::common::{InboundEvent, InboundMessage};
use crate::moderation::gateway::Gateway;
use crate::moderation::persist::StateObserver;
use crate::moderation::state::StateSnapshot;

pub const BOT_ID: &str = "999";
pub const GUILD_ID: &str = "1000";
pub const CHANNEL_ID: &str = "10";

const DM_PREFIX: &str = "dm:";

/// Something the fake gateway was asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel { channel_id: String, content: String },
    Direct { user_id: String, content: String },
}

impl Sent {
    pub fn channel(channel_id: &str, content: &str) -> Self {
        Self::Channel {
            channel_id: channel_id.to_string(),
            content: content.to_string(),
        }
    }

    pub fn direct(user_id: &str, content: &str) -> Self {
        Self::Direct {
            user_id: user_id.to_string(),
            content: content.to_string(),
        }
    }
}

/// Records every outbound call. Users are unknown to the guild unless added.
#[derive(Default)]
pub struct FakeGateway {
    members: HashSet<String>,
    managers: HashSet<String>,
    closed_dms: HashSet<String>,
    failing_deletes: bool,
    failing_permissions: bool,
    sent: Mutex<Vec<Sent>>,
    deleted: Mutex<Vec<(String, String)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, user_id: &str) -> Self {
        self.members.insert(user_id.to_string());
        self
    }

    /// A guild member holding "Manage Server".
    pub fn with_manager(mut self, user_id: &str) -> Self {
        self.members.insert(user_id.to_string());
        self.managers.insert(user_id.to_string());
        self
    }

    pub fn with_closed_dms(mut self, user_id: &str) -> Self {
        self.closed_dms.insert(user_id.to_string());
        self
    }

    pub fn with_failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }

    pub fn with_failing_permissions(mut self) -> Self {
        self.failing_permissions = true;
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn direct_messages_to(&self, user_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Direct { user_id: to, content } if to == user_id => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn channel_messages(&self, channel_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Channel { channel_id: to, content } if to == channel_id => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Deleted message ids, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message_id)| message_id.clone())
            .collect()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    fn current_user_id(&self) -> String {
        BOT_ID.to_string()
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> GatewayResult<()> {
        let sent = match channel_id.strip_prefix(DM_PREFIX) {
            Some(user_id) => Sent::direct(user_id, content),
            None => Sent::channel(channel_id, content),
        };
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> GatewayResult<()> {
        if self.failing_deletes {
            return Err(GatewayError::Request {
                message: "missing permissions".to_string(),
            });
        }
        self.deleted
            .lock()
            .unwrap()
            .push((channel_id.to_string(), message_id.to_string()));
        Ok(())
    }

    async fn open_direct_channel(&self, user_id: &str) -> GatewayResult<String> {
        if self.closed_dms.contains(user_id) {
            return Err(GatewayError::RecipientUnavailable);
        }
        Ok(format!("{}{}", DM_PREFIX, user_id))
    }

    async fn user_has_manage_permission(
        &self,
        _guild_id: &str,
        _channel_id: &str,
        user_id: &str,
    ) -> GatewayResult<bool> {
        if self.failing_permissions {
            return Err(GatewayError::NotFound {
                what: format!("member {}", user_id),
            });
        }
        Ok(self.managers.contains(user_id))
    }

    async fn user_exists_in_guild(&self, _guild_id: &str, user_id: &str) -> GatewayResult<bool> {
        Ok(self.members.contains(user_id))
    }
}

/// Counts persistence calls and keeps the latest snapshot.
#[derive(Default)]
pub struct CountingObserver {
    calls: AtomicUsize,
    last: Mutex<Option<StateSnapshot>>,
    failing: bool,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<StateSnapshot> {
        self.last.lock().unwrap().clone()
    }
}

impl StateObserver for CountingObserver {
    fn on_state_changed(&self, snapshot: &StateSnapshot) -> Result<(), PersistError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(PersistError::Write {
                path: "config.json".to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        *self.last.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }
}

/// A guild message in the test guild's default channel.
pub fn guild_message(id: &str, author_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        id: id.to_string(),
        channel_id: CHANNEL_ID.to_string(),
        guild_id: Some(GUILD_ID.to_string()),
        author_id: author_id.to_string(),
        content: content.to_string(),
    }
}

pub fn created(id: &str, author_id: &str, content: &str) -> InboundEvent {
    InboundEvent::Created(guild_message(id, author_id, content))
}

pub fn edited(id: &str, author_id: &str, content: &str) -> InboundEvent {
    InboundEvent::Edited(guild_message(id, author_id, content))
}
