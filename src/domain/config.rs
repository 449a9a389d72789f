//! # Configuration
//!
//! Manages the loading and parsing of the bot's settings file (`config.yaml`)
//! and defines the channel credentials (`Configuration`) kept in the secrets store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "data/config.yaml";

const MAX_LOGIN_LEN: usize = 25;

/// Main application settings.
/// Matches the layout of `data/config.yaml`; every section is optional.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub twitch: TwitchConfig,
    #[serde(default)]
    pub joke: JokeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: char,
    /// Display name used in notification titles.
    #[serde(default = "default_bot_name")]
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            name: default_bot_name(),
        }
    }
}

fn default_prefix() -> char {
    '!'
}

fn default_bot_name() -> String {
    "Awesom-O".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Connection settings for the Twitch chat client.
#[derive(Debug, Deserialize, Clone)]
pub struct TwitchConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct JokeConfig {
    #[serde(default = "default_joke_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_joke_timeout")]
    pub timeout_secs: u64,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_joke_endpoint(),
            timeout_secs: default_joke_timeout(),
        }
    }
}

fn default_joke_endpoint() -> String {
    "https://icanhazdadjoke.com/".to_string()
}

fn default_joke_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// File name inside the data directory.
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_file() -> String {
    "session.log".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Channel credentials plus the reconnect flag.
/// Stored under the `config` key of the secrets file with short field names (`name`, `bot`, `oauth`, `autoConnect`).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "name", default)]
    pub channel_name: String,
    #[serde(rename = "bot", default)]
    pub bot_username: String,
    #[serde(rename = "oauth", default)]
    pub oauth_token: String,
    #[serde(rename = "autoConnect", default)]
    pub auto_connect: bool,
}

impl Configuration {
    /// A configuration is usable only when all three credentials are present
    /// and the channel and bot are valid Twitch login names.
    pub fn is_valid(&self) -> bool {
        is_login(self.owner()) && is_login(&self.bot_username) && !self.oauth_token.trim().is_empty()
    }

    /// The channel owner, i.e. the channel name without its `#`.
    pub fn owner(&self) -> &str {
        self.channel_name.trim_start_matches('#')
    }

    /// Channel name in IRC form (`#channel`).
    pub fn channel(&self) -> String {
        format!("#{}", self.owner().to_lowercase())
    }
}

/// Twitch logins: 1-25 characters, alphanumeric or underscore.
fn is_login(name: &str) -> bool {
    (1..=MAX_LOGIN_LEN).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.bot.prefix, '!');
        assert_eq!(config.storage.data_dir, "data");
        assert_eq!(config.twitch.connect_timeout_secs, 20);
    }

    #[test]
    fn test_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bot:\n  prefix: '?'\ntwitch:\n  connect_timeout_secs: 5\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.bot.prefix, '?');
        assert_eq!(config.bot.name, "Awesom-O");
        assert_eq!(config.twitch.connect_timeout_secs, 5);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_configuration_validity() {
        let mut config = Configuration {
            channel_name: "#scanf".to_string(),
            bot_username: "awesomo".to_string(),
            oauth_token: "secret".to_string(),
            auto_connect: false,
        };
        assert!(config.is_valid());
        assert_eq!(config.owner(), "scanf");
        assert_eq!(config.channel(), "#scanf");

        config.channel_name = "#Scanf".to_string();
        assert!(config.is_valid());
        assert_eq!(config.channel(), "#scanf");

        config.channel_name = "#scan f".to_string();
        assert!(!config.is_valid());
        config.channel_name = "#scanf".to_string();
        config.bot_username = "a".repeat(26);
        assert!(!config.is_valid());
        config.bot_username = "awesomo".to_string();

        config.oauth_token = "  ".to_string();
        assert!(!config.is_valid());
        assert!(!Configuration::default().is_valid());
    }

    #[test]
    fn test_configuration_field_names() {
        let json = r#"{"name":"scanf","bot":"awesomo","oauth":"oauth:x","autoConnect":true}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.channel_name, "scanf");
        assert_eq!(config.bot_username, "awesomo");
        assert!(config.auto_connect);
    }
}
