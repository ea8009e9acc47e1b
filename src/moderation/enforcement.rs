//! Word restriction enforcement.
//!
//! Decides whether a message falls under the restriction and which of
//! its words are not allowed. Performing the deletion and sending the
//! notice is left to the dispatcher.
//!
//! Messages are split on single spaces with no punctuation handling,
//! so `cat.` or `cat,` never match `cat` and are reported. Empty tokens
//! from repeated spaces, and the empty content of an attachment-only
//! message, are never in the lexicon and count as violations too.

use std::sync::Arc;

use crate::common::InboundMessage;
use crate::moderation::lexicon::Lexicon;
use crate::moderation::state::ModerationState;

/// Discord's maximum message length.
pub const MAX_MESSAGE_LEN: usize = 2000;

const USER_NOTICE: &str = "You can only talk with the ten hundred most used words now. \
https://xkcd.com/simplewriter/\nThese words are not simple: ";

const CHANNEL_NOTICE: &str = "You can only talk with the ten hundred most used words in this channel. \
https://xkcd.com/simplewriter/\nThese words are not simple: ";

const RETRY_LINE: &str = "\nPlease try again.";

const ELIDED: &str = ", ...";

/// Why a message is under the restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Posted in the restricted channel. Wins over `User` when both apply.
    Channel,
    /// The author is muted.
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Neither the author nor the channel is restricted.
    NotSubject,
    /// Restricted, but every word is allowed.
    Clean,
    /// Delete the message and tell the author which words were not allowed.
    Violation { trigger: Trigger, words: Vec<String> },
}

pub struct EnforcementEngine {
    lexicon: Arc<Lexicon>,
}

impl EnforcementEngine {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn evaluate(&self, message: &InboundMessage, state: &ModerationState) -> Verdict {
        let trigger = if state.is_muted_channel(&message.channel_id) {
            Trigger::Channel
        } else if state.is_muted(&message.author_id) {
            Trigger::User
        } else {
            return Verdict::NotSubject;
        };

        let words = self.violations(&message.content);
        if words.is_empty() {
            Verdict::Clean
        } else {
            Verdict::Violation { trigger, words }
        }
    }

    /// Words not in the lexicon, in the order they appear. Repeats are kept.
    pub fn violations(&self, content: &str) -> Vec<String> {
        content
            .split(' ')
            .filter(|token| !self.lexicon.exists(token))
            .map(str::to_string)
            .collect()
    }
}

/// Build the direct message sent after a deletion.
///
/// `show_unmute_hint` should reflect whether the author can manage the
/// server; the hint is never shown for channel restrictions. Words that
/// would push the notice past `MAX_MESSAGE_LEN` are left out.
pub fn build_notice(
    trigger: Trigger,
    words: &[String],
    command_prefix: &str,
    author_id: &str,
    show_unmute_hint: bool,
) -> String {
    let head = match trigger {
        Trigger::Channel => CHANNEL_NOTICE,
        Trigger::User => USER_NOTICE,
    };

    let mut tail = RETRY_LINE.to_string();
    if show_unmute_hint && trigger == Trigger::User {
        tail.push_str(&format!(
            "\nPaste `{} unmute {}` in the server to unmute yourself. \
[This line is displayed to users who can manage the server only]",
            command_prefix, author_id
        ));
    }

    let budget = MAX_MESSAGE_LEN.saturating_sub(head.len() + tail.len() + ELIDED.len());
    let mut listed = String::new();
    for (i, word) in words.iter().enumerate() {
        let separator = if i == 0 { "" } else { ", " };
        if listed.len() + separator.len() + word.len() > budget {
            listed.push_str(if i == 0 { "..." } else { ELIDED });
            break;
        }
        listed.push_str(separator);
        listed.push_str(word);
    }

    format!("{}{}{}", head, listed, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::testing::guild_message;

    fn engine() -> EnforcementEngine {
        let lexicon = Lexicon::build("the\ncat\nsat".as_bytes()).unwrap();
        EnforcementEngine::new(Arc::new(lexicon))
    }

    fn state_with_muted(user: &str) -> ModerationState {
        let mut state = ModerationState::new("1000", "!th", 30);
        state.mute(user).unwrap();
        state
    }

    #[test]
    fn test_unrestricted_message_is_not_subject() {
        let state = ModerationState::new("1000", "!th", 30);
        let message = guild_message("1", "5", "anything goes here!");
        assert_eq!(engine().evaluate(&message, &state), Verdict::NotSubject);
    }

    #[test]
    fn test_allowed_words_pass() {
        let state = state_with_muted("5");
        let message = guild_message("1", "5", "the cat sat");
        assert_eq!(engine().evaluate(&message, &state), Verdict::Clean);
    }

    #[test]
    fn test_muted_user_violation() {
        let state = state_with_muted("5");
        let message = guild_message("1", "5", "The cat ran");
        assert_eq!(
            engine().evaluate(&message, &state),
            Verdict::Violation {
                trigger: Trigger::User,
                words: vec!["ran".to_string()],
            }
        );
    }

    #[test]
    fn test_channel_trigger_wins() {
        let mut state = state_with_muted("5");
        state.set_muted_channel(&guild_message("1", "5", "").channel_id).unwrap();
        let message = guild_message("1", "5", "dog");
        assert!(matches!(
            engine().evaluate(&message, &state),
            Verdict::Violation { trigger: Trigger::Channel, .. }
        ));
    }

    #[test]
    fn test_other_channel_not_subject() {
        let mut state = ModerationState::new("1000", "!th", 30);
        state.set_muted_channel("777").unwrap();
        let message = guild_message("1", "5", "dog");
        assert_eq!(engine().evaluate(&message, &state), Verdict::NotSubject);
    }

    #[test]
    fn test_punctuation_is_a_violation() {
        assert_eq!(engine().violations("the cat."), vec!["cat."]);
    }

    #[test]
    fn test_violations_keep_order_and_repeats() {
        assert_eq!(
            engine().violations("dog the fish dog"),
            vec!["dog", "fish", "dog"]
        );
    }

    #[test]
    fn test_empty_tokens_are_violations() {
        assert_eq!(engine().violations("the  cat"), vec![""]);
        assert_eq!(engine().violations("the cat "), vec![""]);
        assert_eq!(engine().violations(""), vec![""]);
    }

    #[test]
    fn test_attachment_only_message_from_muted_user() {
        let state = state_with_muted("5");
        let message = guild_message("1", "5", "");
        assert_eq!(
            engine().evaluate(&message, &state),
            Verdict::Violation {
                trigger: Trigger::User,
                words: vec![String::new()],
            }
        );
    }

    #[test]
    fn test_user_notice_with_hint() {
        let words = vec!["ran".to_string(), "fast".to_string()];
        let notice = build_notice(Trigger::User, &words, "!th", "5", true);
        assert!(notice.starts_with(USER_NOTICE));
        assert!(notice.contains("not simple: ran, fast\nPlease try again."));
        assert!(notice.contains("`!th unmute 5`"));
    }

    #[test]
    fn test_user_notice_without_hint() {
        let words = vec!["ran".to_string()];
        let notice = build_notice(Trigger::User, &words, "!th", "5", false);
        assert!(notice.ends_with("ran\nPlease try again."));
    }

    #[test]
    fn test_channel_notice_never_hints() {
        let words = vec!["ran".to_string()];
        let notice = build_notice(Trigger::Channel, &words, "!th", "5", true);
        assert!(notice.starts_with(CHANNEL_NOTICE));
        assert!(!notice.contains("unmute"));
    }

    #[test]
    fn test_notice_fits_message_limit() {
        let words: Vec<String> = (0..500).map(|i| format!("word{}", i)).collect();
        let notice = build_notice(Trigger::User, &words, "!th", "5", true);
        assert!(notice.len() <= MAX_MESSAGE_LEN);
        assert!(notice.contains("word0, word1"));
        assert!(notice.contains(", ...\nPlease try again."));
    }
}
