//! Tenhundred - Discord bot that restricts users to simple words
//!
//! Muted users, and everyone in a muted channel, may only post words from
//! the ten hundred most used English words. Other messages are deleted and
//! the author is told which words were not allowed.

mod common;
mod config;
mod discord;
mod moderation;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use config::env::{apply_env_overrides, get_config_path};
use config::{load_config, validate_config, write_default_config, Config, JsonConfigStore};
use discord::DiscordBotBuilder;
use moderation::{policy_from_config, EventDispatcher, Lexicon, ModerationState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Tenhundred v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();

    if !Path::new(&config_path).exists() {
        write_default_config(&config_path)?;
        warn!("No configuration found, wrote a default one to {}", config_path);
        anyhow::bail!(
            "fill in botToken and serverID in {} and start the bot again",
            config_path
        );
    }

    info!("Loading configuration from {}...", config_path);
    let file_config = load_config(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} is properly formatted.", config_path);
        e
    })?;
    let config = apply_env_overrides(file_config.clone());

    let dispatcher = build_dispatcher(&config_path, file_config, &config).map_err(|e| {
        error!("Failed to start: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Server: {}", config.server_id);
    info!("  Command prefix: {}", config.command_prefix);
    info!(
        "  Muted users: {}/{}",
        config.muted_users.len(),
        config.effective_max_muted_users()
    );
    if let Some(channel) = config.muted_channel() {
        info!("  Muted channel: {}", channel);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let discord_bot = DiscordBotBuilder::new(config.bot_token.clone(), Arc::new(dispatcher), shutdown_rx)
        .build()
        .await?;

    info!("Starting Discord bot...");
    let mut discord_task = tokio::spawn(discord_bot.run());

    let finished = tokio::select! {
        biased;
        _ = shutdown_signal() => None,
        joined = &mut discord_task => Some(joined),
    };

    let result = match finished {
        Some(Ok(result)) => result,
        Some(Err(e)) => Err(e.into()),
        None => {
            info!("Shutdown signal received - stopping...");
            if let Err(e) = shutdown_tx.send(true) {
                debug!("Shutdown channel closed (bot already exited): {}", e);
            }
            let timeout = tokio::time::Duration::from_secs(5);
            match tokio::time::timeout(timeout, discord_task).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    warn!("Discord task panicked: {}", e);
                    Ok(())
                }
                Err(_) => {
                    warn!("Discord shutdown timed out");
                    Ok(())
                }
            }
        }
    };

    info!("Exiting...");
    result
}

/// Build the moderation core from the loaded configuration.
///
/// `file_config` is what is on disk; state changes are merged into it so
/// environment overrides never end up in the file.
fn build_dispatcher(
    config_path: &str,
    file_config: Config,
    config: &Config,
) -> common::error::Result<EventDispatcher> {
    validate_config(config)?;

    let lexicon = Lexicon::from_file(&config.words_file)?;
    info!("Loaded {} words from {}", lexicon.len(), config.words_file);

    let state = ModerationState::from_config(config);
    let store = JsonConfigStore::new(config_path, file_config);

    Ok(EventDispatcher::new(
        state,
        Arc::new(lexicon),
        policy_from_config(config),
        Box::new(store),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
