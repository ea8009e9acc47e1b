//! Discord integration.
//!
//! Connects to Discord, converts gateway events into `InboundEvent`s and
//! performs the moderation core's outbound calls through serenity.

pub mod client;
pub mod gateway;

pub use client::DiscordBotBuilder;
