use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::fetchers::DEFAULT_USER_AGENT;

/// Application settings
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// SQLite database file holding recipes and the shopping list
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Page download settings
    #[serde(default)]
    pub fetch: FetchSettings,
}

/// Settings for downloading recipe pages
#[derive(Debug, Deserialize, Clone)]
pub struct FetchSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            fetch: FetchSettings::default(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_database_path() -> String {
    "wolfgang.db".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Settings {
    /// Load settings from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with WOLFGANG__ prefix
    /// 2. wolfgang.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: WOLFGANG__FETCH__TIMEOUT_SECS
    pub fn load() -> Result<Self, ConfigError> {
        load_settings("wolfgang")
    }
}

/// Load settings from `<name>.toml` (optional) and `WOLFGANG__` variables.
pub fn load_settings(name: &str) -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name(name).required(false))
        .add_source(
            Environment::with_prefix("WOLFGANG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
