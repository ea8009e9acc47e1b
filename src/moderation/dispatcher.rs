//! Entry point for every inbound message event.
//!
//! The whole of `dispatch` runs under one lock on `ModerationState`, so
//! only one event is decided and acted on at a time and mutations from
//! different commands never interleave. Outbound calls are made while
//! the lock is held.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::common::error::PersistError;
use crate::common::{InboundEvent, InboundMessage};
use crate::moderation::auth::AuthorizationPolicy;
use crate::moderation::commands::CommandProcessor;
use crate::moderation::enforcement::{build_notice, EnforcementEngine, Trigger, Verdict};
use crate::moderation::gateway::{delete_message, send_private_message, Gateway};
use crate::moderation::lexicon::Lexicon;
use crate::moderation::persist::StateObserver;
use crate::moderation::state::{ModerationState, StateSnapshot};

pub struct EventDispatcher {
    state: Mutex<ModerationState>,
    engine: EnforcementEngine,
    policy: Box<dyn AuthorizationPolicy>,
    observer: Box<dyn StateObserver>,
}

impl EventDispatcher {
    pub fn new(
        state: ModerationState,
        lexicon: Arc<Lexicon>,
        policy: Box<dyn AuthorizationPolicy>,
        observer: Box<dyn StateObserver>,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            engine: EnforcementEngine::new(lexicon),
            policy,
            observer,
        }
    }

    /// Handle one event.
    ///
    /// Gateway failures are reported or logged and never returned; only a
    /// failure to persist state escapes, and it is meant to stop the bot.
    pub async fn dispatch(
        &self,
        gateway: &dyn Gateway,
        event: InboundEvent,
    ) -> Result<(), PersistError> {
        let mut state = self.state.lock().await;
        let self_id = gateway.current_user_id();

        let message = event.message();
        if !is_in_scope(message, &state, &self_id) {
            debug!("Ignoring message {} outside of scope", message.id);
            return Ok(());
        }

        match event {
            InboundEvent::Created(message) => {
                if self.is_command(gateway, &message, &state, &self_id).await {
                    CommandProcessor::new(gateway, self.observer.as_ref())
                        .execute(&message, &mut state)
                        .await
                } else {
                    self.enforce(gateway, &message, &state).await;
                    Ok(())
                }
            }
            InboundEvent::Edited(message) => {
                self.enforce(gateway, &message, &state).await;
                Ok(())
            }
        }
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Prefixed (or addressed to the bot) and sent by someone allowed to command it.
    async fn is_command(
        &self,
        gateway: &dyn Gateway,
        message: &InboundMessage,
        state: &ModerationState,
        self_id: &str,
    ) -> bool {
        if !has_command_prefix(&message.content, state.command_prefix(), self_id) {
            return false;
        }
        self.policy
            .is_authorized(gateway, state.server_id(), &message.channel_id, &message.author_id)
            .await
    }

    async fn enforce(&self, gateway: &dyn Gateway, message: &InboundMessage, state: &ModerationState) {
        let (trigger, words) = match self.engine.evaluate(message, state) {
            Verdict::Violation { trigger, words } => (trigger, words),
            Verdict::NotSubject | Verdict::Clean => return,
        };

        info!(
            "Deleting message {} from {} ({:?}): {:?}",
            message.id, message.author_id, trigger, words
        );
        delete_message(gateway, &message.channel_id, &message.id).await;

        let show_unmute_hint = trigger == Trigger::User
            && self
                .policy
                .is_authorized(gateway, state.server_id(), &message.channel_id, &message.author_id)
                .await;

        let notice = build_notice(
            trigger,
            &words,
            state.command_prefix(),
            &message.author_id,
            show_unmute_hint,
        );
        send_private_message(gateway, &message.author_id, &notice).await;
    }
}

/// Not our own message, not a DM, and from the configured server.
fn is_in_scope(message: &InboundMessage, state: &ModerationState, self_id: &str) -> bool {
    message.author_id != self_id && message.guild_id.as_deref() == Some(state.server_id())
}

/// Starts with `<prefix> ` or with a mention of the bot.
///
/// The trailing space keeps a prefix like `!t` from firing on `!th`.
pub fn has_command_prefix(content: &str, command_prefix: &str, self_id: &str) -> bool {
    let prefixed = content.len() > command_prefix.len() + 1
        && content.starts_with(command_prefix)
        && content[command_prefix.len()..].starts_with(' ');

    let mentioned = [format!("<@!{}>", self_id), format!("<@{}>", self_id)]
        .iter()
        .any(|mention| content.len() > mention.len() && content.starts_with(mention.as_str()));

    prefixed || mentioned
}
