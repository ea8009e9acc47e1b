//! Inbound event types delivered by the messaging gateway.
//!
//! Ids are Discord snowflakes kept as decimal strings, the same form
//! they take in the persisted config.

/// A guild or direct message as seen by the moderation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message id.
    pub id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Guild the message belongs to (None for direct messages).
    pub guild_id: Option<String>,
    /// Author's user id.
    pub author_id: String,
    /// Raw message text.
    pub content: String,
}

/// An inbound message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A new message was posted.
    Created(InboundMessage),
    /// An existing message was edited; carries the edited content.
    Edited(InboundMessage),
}

impl InboundEvent {
    pub fn message(&self) -> &InboundMessage {
        match self {
            Self::Created(message) | Self::Edited(message) => message,
        }
    }
}
