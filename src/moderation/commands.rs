//! Moderation commands (`<prefix> mute @user`, `<prefix> set`, ...).
//!
//! Only reached once the dispatcher has checked that the message starts
//! with the prefix or a bot mention and that the sender is authorized.
//! Every successful mutation is persisted through the `StateObserver`
//! exactly once; refusals and `help` never touch it.

use tracing::{debug, info, warn};

use crate::common::error::{ModerationError, PersistError};
use crate::common::InboundMessage;
use crate::moderation::enforcement::MAX_MESSAGE_LEN;
use crate::moderation::gateway::{
    delete_message, send_channel_message, send_private_message, Gateway,
};
use crate::moderation::persist::StateObserver;
use crate::moderation::state::ModerationState;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Restrict the channel the command was sent in.
    SetChannel,
    /// Lift the channel restriction.
    RemoveChannel,
    Prefix(String),
    Mute(String),
    Unmute(String),
    /// Unknown keyword or a missing argument.
    Invalid,
}

/// Parse command text: `<prefix|mention> <keyword> [argument]`.
///
/// Returns `None` when there is no keyword at all. Extra tokens are ignored.
pub fn parse_command(content: &str) -> Option<Command> {
    let tokens: Vec<&str> = content.split(' ').collect();
    if tokens.len() < 2 {
        return None;
    }

    let argument = tokens.get(2).map(|arg| normalize_user_id(arg).to_string());

    let command = match (tokens[1], argument) {
        ("help", _) => Command::Help,
        ("set", _) => Command::SetChannel,
        ("rem", _) => Command::RemoveChannel,
        ("prefix", Some(prefix)) => Command::Prefix(prefix),
        ("mute", Some(user)) => Command::Mute(user),
        ("unmute", Some(user)) => Command::Unmute(user),
        _ => Command::Invalid,
    };
    Some(command)
}

/// Strip user mention wrapping (`<@!id>` or `<@id>`).
///
/// Anything else, including role mentions and mentions with no id, is
/// returned as given.
pub fn normalize_user_id(argument: &str) -> &str {
    let body = match argument.strip_prefix("<@!") {
        Some(rest) => rest,
        None => match argument.strip_prefix("<@") {
            Some(rest) => rest,
            None => return argument,
        },
    };

    match body.strip_suffix('>') {
        Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => id,
        _ => argument,
    }
}

/// Command reference sent to whoever asks for `help`.
pub fn help_text(command_prefix: &str, bot_id: &str) -> String {
    let mut text = String::from("Visit https://xkcd.com/simplewriter/ to try the ten hundred words.\n");
    text.push_str(&format!(
        "Commands (**{}** can be replaced with <@{}>):\n",
        command_prefix, bot_id
    ));
    text.push_str(&format!(
        "**{} set** - Only allows the 1000 most common words in the channel this is run in.\n",
        command_prefix
    ));
    text.push_str(&format!(
        "**{} rem** - Removes the restriction from the currently set channel.\n",
        command_prefix
    ));
    text.push_str(&format!(
        "**{} unmute (@User)** - Unmutes a user.\n",
        command_prefix
    ));
    text.push_str(&format!(
        "**{} mute (@User)** - Restricts a user to using only the 1000 most common words.\n",
        command_prefix
    ));
    text.push_str(&format!(
        "**{} prefix (yourNewPrefix)** - Changes the prefix this bot responds to. Currently set to **{}**\n",
        command_prefix, command_prefix
    ));
    text
}

/// Reply for a mute refused because the list is full.
///
/// Suggests unmuting the oldest users first, one line each, stopping
/// before the reply would exceed `MAX_MESSAGE_LEN` bytes.
pub fn capacity_message(state: &ModerationState) -> String {
    let mut message = format!(
        "You've reached the max mutable users [{}/{}]\nConsider unmuting these older users (ordered old to new):\n",
        state.muted_users().len(),
        state.max_muted_users()
    );

    for user in state.muted_users() {
        let line = format!("**{} unmute {}**\n", state.command_prefix(), user);
        if message.len() + line.len() > MAX_MESSAGE_LEN {
            break;
        }
        message.push_str(&line);
    }
    message
}

const CHANNEL_SET: &str = "All people are only allowed to talk with simple words in this area now.";
const CHANNEL_ALREADY_SET: &str = "This area already only allows simple words.";
const CHANNEL_REMOVED: &str = "Removed simple talk policing in this area.";
const NO_CHANNEL_SET: &str = "There is no place to remove simple talk policing.";
const USER_NOT_IN_GUILD: &str = "User does not exist in this server.";
const ALREADY_MUTED: &str = "That user is already muted.";
const NOT_MUTED: &str = "That user is not muted.";
const EMPTY_PREFIX: &str = "The prefix cannot be empty.";
const PREFIX_WHITESPACE: &str = "The prefix cannot contain spaces, tabs or line breaks.";
const SELF_MUTE: &str = "I cannot be muted. I don't play by your rules, human.";

/// Runs one command against the state.
pub struct CommandProcessor<'a> {
    gateway: &'a dyn Gateway,
    observer: &'a dyn StateObserver,
}

impl<'a> CommandProcessor<'a> {
    pub fn new(gateway: &'a dyn Gateway, observer: &'a dyn StateObserver) -> Self {
        Self { gateway, observer }
    }

    /// Execute the command in `message`.
    ///
    /// Only a persistence failure is returned; everything else is
    /// reported to the sender.
    pub async fn execute(
        &self,
        message: &InboundMessage,
        state: &mut ModerationState,
    ) -> Result<(), PersistError> {
        let command = match parse_command(&message.content) {
            Some(command) => command,
            None => {
                debug!("Ignoring command without a keyword from {}", message.author_id);
                return Ok(());
            }
        };

        info!(
            "Command {:?} from {} in channel {}",
            command, message.author_id, message.channel_id
        );

        match command {
            Command::Help => {
                let text = help_text(state.command_prefix(), &self.gateway.current_user_id());
                send_private_message(self.gateway, &message.author_id, &text).await;
            }
            Command::SetChannel => match state.set_muted_channel(&message.channel_id) {
                Ok(()) => {
                    self.persist(state)?;
                    self.reply_in_channel(message, CHANNEL_SET).await;
                }
                Err(_) => self.reply_in_channel(message, CHANNEL_ALREADY_SET).await,
            },
            Command::RemoveChannel => match state.clear_muted_channel() {
                Ok(()) => {
                    self.persist(state)?;
                    self.reply_in_channel(message, CHANNEL_REMOVED).await;
                }
                Err(_) => self.reply_in_channel(message, NO_CHANNEL_SET).await,
            },
            Command::Prefix(prefix) => match state.set_command_prefix(&prefix) {
                Ok(()) => {
                    self.persist(state)?;
                    let text = format!("This bot will now respond to **{}**", prefix);
                    self.reply_privately(message, &text).await;
                }
                Err(ModerationError::PrefixWhitespace(_)) => {
                    self.reply_privately(message, PREFIX_WHITESPACE).await
                }
                Err(_) => self.reply_privately(message, EMPTY_PREFIX).await,
            },
            Command::Mute(target) => self.mute(message, state, &target).await?,
            Command::Unmute(target) => self.unmute(message, state, &target).await?,
            Command::Invalid => {
                let text = format!("Invalid command. Try {} mute @USER", state.command_prefix());
                self.reply_privately(message, &text).await;
                delete_message(self.gateway, &message.channel_id, &message.id).await;
            }
        }

        Ok(())
    }

    async fn mute(
        &self,
        message: &InboundMessage,
        state: &mut ModerationState,
        target: &str,
    ) -> Result<(), PersistError> {
        if target == self.gateway.current_user_id() {
            self.reply_in_channel(message, SELF_MUTE).await;
            return Ok(());
        }

        if !self.in_guild(state.server_id(), target).await {
            self.reply_privately(message, USER_NOT_IN_GUILD).await;
            return Ok(());
        }

        match state.mute(target) {
            Ok(()) => {
                self.persist(state)?;
                info!("Muted {} ({}/{})", target, state.muted_users().len(), state.max_muted_users());
                let text = format!(
                    "<@{}> can only talk with the ten hundred most used words now (simple words).",
                    target
                );
                self.reply_in_channel(message, &text).await;
            }
            Err(ModerationError::CapacityReached { .. }) => {
                self.reply_privately(message, &capacity_message(state)).await;
            }
            Err(_) => {
                self.reply_privately(message, ALREADY_MUTED).await;
                delete_message(self.gateway, &message.channel_id, &message.id).await;
            }
        }
        Ok(())
    }

    async fn unmute(
        &self,
        message: &InboundMessage,
        state: &mut ModerationState,
        target: &str,
    ) -> Result<(), PersistError> {
        if !self.in_guild(state.server_id(), target).await {
            self.reply_privately(message, USER_NOT_IN_GUILD).await;
            return Ok(());
        }

        match state.unmute(target) {
            Ok(()) => {
                self.persist(state)?;
                info!("Unmuted {}", target);
                let text = format!("<@{}> can talk with any words now.", target);
                self.reply_in_channel(message, &text).await;
            }
            Err(_) => {
                self.reply_privately(message, NOT_MUTED).await;
                delete_message(self.gateway, &message.channel_id, &message.id).await;
            }
        }
        Ok(())
    }

    async fn in_guild(&self, guild_id: &str, user_id: &str) -> bool {
        match self.gateway.user_exists_in_guild(guild_id, user_id).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Member lookup for {} failed: {}", user_id, e);
                false
            }
        }
    }

    fn persist(&self, state: &ModerationState) -> Result<(), PersistError> {
        self.observer.on_state_changed(&state.snapshot())
    }

    async fn reply_in_channel(&self, message: &InboundMessage, text: &str) {
        send_channel_message(self.gateway, &message.channel_id, text).await;
    }

    async fn reply_privately(&self, message: &InboundMessage, text: &str) {
        send_private_message(self.gateway, &message.author_id, text).await;
    }
}
