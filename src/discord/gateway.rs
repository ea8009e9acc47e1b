//! serenity-backed implementation of the messaging gateway.

use serenity::all::{ChannelId, Context, GuildId, MessageId, UserId};
use serenity::async_trait;
use serenity::http::HttpError;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;

use crate::common::error::{GatewayError, GatewayResult};
use crate::common::InboundMessage;
use crate::moderation::Gateway;

/// Discord JSON error code for "Cannot send messages to this user".
const CANNOT_MESSAGE_USER: isize = 50007;

/// Gateway bound to the context of the event being handled.
pub struct SerenityGateway {
    context: Context,
}

impl SerenityGateway {
    pub fn new(context: Context) -> Self {
        Self { context }
    }
}

fn parse_id(id: &str) -> GatewayResult<u64> {
    id.parse::<u64>()
        .ok()
        .filter(|value| *value != 0)
        .ok_or_else(|| GatewayError::InvalidId { id: id.to_string() })
}

fn classify(error: serenity::Error) -> GatewayError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &error {
        if response.error.code == CANNOT_MESSAGE_USER {
            return GatewayError::RecipientUnavailable;
        }
        if response.status_code.as_u16() == 404 {
            return GatewayError::NotFound {
                what: response.error.message.clone(),
            };
        }
    }
    GatewayError::Request {
        message: error.to_string(),
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    fn current_user_id(&self) -> String {
        self.context.cache.current_user().id.to_string()
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> GatewayResult<()> {
        ChannelId::new(parse_id(channel_id)?)
            .say(&self.context.http, content)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> GatewayResult<()> {
        ChannelId::new(parse_id(channel_id)?)
            .delete_message(&self.context.http, MessageId::new(parse_id(message_id)?))
            .await
            .map_err(classify)
    }

    async fn open_direct_channel(&self, user_id: &str) -> GatewayResult<String> {
        UserId::new(parse_id(user_id)?)
            .create_dm_channel(&self.context)
            .await
            .map(|channel| channel.id.to_string())
            .map_err(classify)
    }

    async fn user_has_manage_permission(
        &self,
        guild_id: &str,
        channel_id: &str,
        user_id: &str,
    ) -> GatewayResult<bool> {
        let guild_id = GuildId::new(parse_id(guild_id)?);
        let channel_id = ChannelId::new(parse_id(channel_id)?);
        let user_id = UserId::new(parse_id(user_id)?);

        let member = guild_id
            .member(&self.context, user_id)
            .await
            .map_err(classify)?;

        let guild = self
            .context
            .cache
            .guild(guild_id)
            .ok_or_else(|| GatewayError::NotFound {
                what: format!("guild {} in cache", guild_id),
            })?;

        // Threads inherit permissions from their parent channel
        let channel = guild.channels.get(&channel_id).or_else(|| {
            guild
                .threads
                .iter()
                .find(|thread| thread.id == channel_id)
                .and_then(|thread| thread.parent_id)
                .and_then(|parent| guild.channels.get(&parent))
        });

        match channel {
            Some(channel) => Ok(guild.user_permissions_in(channel, &member).manage_guild()),
            None => Err(GatewayError::NotFound {
                what: format!("channel {} in cache", channel_id),
            }),
        }
    }

    async fn user_exists_in_guild(&self, guild_id: &str, user_id: &str) -> GatewayResult<bool> {
        let guild_id = GuildId::new(parse_id(guild_id)?);
        let user_id = match parse_id(user_id) {
            Ok(id) => UserId::new(id),
            Err(_) => return Ok(false),
        };

        match guild_id.member(&self.context, user_id).await {
            Ok(_) => Ok(true),
            Err(e) => match classify(e) {
                GatewayError::NotFound { .. } => Ok(false),
                other => Err(other),
            },
        }
    }
}

/// Convert a created message.
pub fn inbound_from_message(message: &Message) -> InboundMessage {
    InboundMessage {
        id: message.id.to_string(),
        channel_id: message.channel_id.to_string(),
        guild_id: message.guild_id.map(|id| id.to_string()),
        author_id: message.author.id.to_string(),
        content: message.content.clone(),
    }
}

/// Convert an edit. Edits without an author or content (embed unfurls) are skipped.
pub fn inbound_from_update(event: &MessageUpdateEvent) -> Option<InboundMessage> {
    let author = event.author.as_ref()?;
    let content = event.content.as_ref()?;

    Some(InboundMessage {
        id: event.id.to_string(),
        channel_id: event.channel_id.to_string(),
        guild_id: event.guild_id.map(|id| id.to_string()),
        author_id: author.id.to_string(),
        content: content.clone(),
    })
}
