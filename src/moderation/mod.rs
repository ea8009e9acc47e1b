//! The moderation core.
//!
//! Decides, for every message in the configured server, whether it is a
//! command that changes who is restricted or a message that has to be
//! checked against the word list.
//!
//! ## Module Structure
//!
//! - `lexicon`: the allowed words
//! - `state`: muted users, muted channel and prefix
//! - `enforcement`: which words break the restriction, and the notice text
//! - `commands`: command parsing and execution
//! - `auth`: who may run commands
//! - `persist`: hook fired after each state change
//! - `gateway`: the messaging operations the core needs
//! - `dispatcher`: routes each event, one at a time

pub mod auth;
pub mod commands;
pub mod dispatcher;
pub mod enforcement;
pub mod gateway;
pub mod lexicon;
pub mod persist;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use auth::policy_from_config;
pub use dispatcher::EventDispatcher;
pub use gateway::Gateway;
pub use lexicon::Lexicon;
pub use state::ModerationState;
