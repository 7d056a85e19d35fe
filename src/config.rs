use crate::env::Environment;
use crate::error::{ConfigError, Error};
use crate::kitbot::Data;
use poise::serenity_prelude as serenity;
use std::path::PathBuf;
use tracing::Level;

pub const BOT_NAME: &str = "Kitbot";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "bot.log";
pub const DEFAULT_MAX_LOGS: usize = 10;

/// Optional settings read alongside the token.
#[derive(Clone, Debug)]
pub struct Settings {
    pub owner_ids: Vec<u64>,
    pub log_channel: Option<u64>,
    pub support_server: Option<String>,
    pub repo_url: Option<String>,
    pub check_updates: bool,
    pub logging: LogSettings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub file: String,
    pub max_files: usize,
    pub level: Level,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
            max_files: DEFAULT_MAX_LOGS,
            level: Level::INFO,
        }
    }
}

impl LogSettings {
    /// Splits the configured file name into the appender's prefix and suffix.
    pub fn file_parts(&self) -> (&str, Option<&str>) {
        match self.file.rsplit_once('.') {
            Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
                (prefix, Some(suffix))
            }
            _ => (self.file.as_str(), None),
        }
    }
}

impl Settings {
    pub fn from_env(env: &Environment) -> Result<Self, ConfigError> {
        let mut logging = LogSettings::default();
        if let Some(dir) = env.optional("LOG_DIR") {
            logging.dir = PathBuf::from(dir);
        }
        if let Some(file) = env.optional("LOG_FILE") {
            logging.file = file.to_string();
        }
        if let Some(max_files) = env.parse::<usize>("MAX_LOGS")? {
            if max_files == 0 {
                return Err(ConfigError::Invalid {
                    key: "MAX_LOGS",
                    value: max_files.to_string(),
                    reason: "at least one log file must be kept".to_string(),
                });
            }
            logging.max_files = max_files;
        }
        if let Some(level) = env.parse::<Level>("LOG_LEVEL")? {
            logging.level = level;
        }
        if env.flag("LOG_DEBUG")?.unwrap_or(false) {
            logging.level = Level::DEBUG;
        }

        Ok(Self {
            owner_ids: env.id_list("OWNER_IDS")?,
            log_channel: env.parse("LOG_CHANNEL")?,
            support_server: env.optional("SUPPORT_SERVER").map(str::to_string),
            repo_url: env.optional("REPO_URL").map(str::to_string),
            check_updates: env.flag("CHECK_UPDATES")?.unwrap_or(true),
            logging,
        })
    }

    /// Repository to check for releases, if the check is enabled.
    pub fn update_source(&self) -> Option<&str> {
        self.repo_url.as_deref().filter(|_| self.check_updates)
    }
}

/// Declares which gateway intents the bot subscribes to.
pub fn gateway_intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Builds the prefix configuration shared by the Poise framework.
pub fn prefix_options() -> poise::PrefixFrameworkOptions<Data, Error> {
    poise::PrefixFrameworkOptions {
        prefix: Some("/".into()),
        ..Default::default()
    }
}
