//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Muted user limit applied when the config leaves it at zero or unset.
pub const DEFAULT_MAX_MUTED_USERS: usize = 30;

/// Prefix written into a freshly generated config.
pub const DEFAULT_COMMAND_PREFIX: &str = "!th";

/// Word list path written into a freshly generated config.
pub const DEFAULT_WORDS_FILE: &str = "wordList.txt";

/// Root configuration structure, persisted as a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Newline-delimited list of the only words muted contexts may use.
    #[serde(rename = "wordsFile", default)]
    pub words_file: String,

    /// Command prefix this bot listens to.
    #[serde(rename = "commandPrefix", default)]
    pub command_prefix: String,

    /// Bot token provided by Discord.
    #[serde(rename = "botToken", default)]
    pub bot_token: String,

    /// The one server this bot operates on.
    #[serde(rename = "serverID", default)]
    pub server_id: String,

    /// Channel where everyone is restricted. Empty means none.
    #[serde(rename = "mutedChannelID", default)]
    pub muted_channel_id: String,

    /// Users restricted in every channel, oldest first.
    #[serde(rename = "mutedUsers", default)]
    pub muted_users: Vec<String>,

    /// Max users that can be muted at the same time.
    #[serde(rename = "maxMutedUsers", default)]
    pub max_muted_users: usize,

    /// Who may run commands.
    #[serde(default)]
    pub authorization: AuthorizationMode,

    /// User ids allowed to run commands in `adminList` mode.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl Config {
    /// Muted user limit with the zero/unset default applied.
    pub fn effective_max_muted_users(&self) -> usize {
        if self.max_muted_users == 0 {
            DEFAULT_MAX_MUTED_USERS
        } else {
            self.max_muted_users
        }
    }

    /// Muted channel as an option; the file stores "none" as an empty string.
    pub fn muted_channel(&self) -> Option<&str> {
        if self.muted_channel_id.is_empty() {
            None
        } else {
            Some(&self.muted_channel_id)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_file: DEFAULT_WORDS_FILE.to_string(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            bot_token: String::new(),
            server_id: String::new(),
            muted_channel_id: String::new(),
            muted_users: Vec::new(),
            max_muted_users: DEFAULT_MAX_MUTED_USERS,
            authorization: AuthorizationMode::default(),
            admins: Vec::new(),
        }
    }
}

/// How command senders are authorized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationMode {
    /// Anyone holding the server's "Manage Server" permission.
    #[default]
    #[serde(rename = "manageServer")]
    ManageServer,
    /// Only the user ids listed in `admins`.
    #[serde(rename = "adminList")]
    AdminList,
}
