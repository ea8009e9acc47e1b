//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Word list error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Failed to write config file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while building the word list.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to open word list '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read word list: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures from the messaging gateway.
///
/// None of these are fatal; callers report them to the invoking user
/// or log and move on.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The recipient does not accept direct messages from us.
    #[error("Recipient does not accept direct messages")]
    RecipientUnavailable,

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invalid id '{id}'")]
    InvalidId { id: String },

    #[error("Request failed: {message}")]
    Request { message: String },
}

/// Failure to write moderation state back to storage. Always fatal.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Business-rule refusals from moderation state mutations.
///
/// State is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("user {0} is already muted")]
    AlreadyMuted(String),

    #[error("user {0} is not muted")]
    NotMuted(String),

    #[error("muted user limit reached ({current}/{max})")]
    CapacityReached { current: usize, max: usize },

    #[error("channel {0} is already restricted")]
    ChannelAlreadySet(String),

    #[error("no restricted channel is set")]
    NoChannelSet,

    #[error("command prefix must not be empty")]
    EmptyPrefix,

    #[error("command prefix '{0}' must not contain whitespace")]
    PrefixWhitespace(String),
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
