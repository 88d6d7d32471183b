//! Persistent hook configuration model and file-backed manager.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use youtrack_api::config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use youtrack_api::{ClientOptions, ProjectConfig};

pub const ENV_BASE_URL: &str = "YOUTRACK_BASE_URL";
pub const ENV_PROJECT_ID: &str = "YOUTRACK_PROJECT_ID";
pub const ENV_USERNAME: &str = "YOUTRACK_USERNAME";
pub const ENV_PASSWORD: &str = "YOUTRACK_PASSWORD";

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Represents the hook configuration persisted on disk: the YouTrack project settings plus
/// transport timeouts. The password is never written; it comes from the keychain or the
/// environment.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub project_id: String,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            project_id: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Overrides project settings with non-empty values from the given lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (ENV_BASE_URL, &mut self.base_url),
            (ENV_PROJECT_ID, &mut self.project_id),
            (ENV_USERNAME, &mut self.username),
            (ENV_PASSWORD, &mut self.password),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|value| !value.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Settings handed to the YouTrack service.
    pub fn project(&self) -> ProjectConfig {
        ProjectConfig::new(
            self.base_url.clone(),
            self.project_id.clone(),
            self.username.clone(),
            self.password.clone(),
        )
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_user_agent(self.user_agent.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Manages loading and saving of hook configuration to a JSON file in the platform-specific
/// config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific config path.
    pub fn new() -> Result<Self, String> {
        let dirs = directories::ProjectDirs::from("com", "crashlytics", "youtrack-hook")
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        let path = dirs.config_dir().join("config.json");
        Ok(Self { path })
    }

    /// Creates a manager bound to an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).unwrap_or_default();
            match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!(
                        "Ignoring unreadable config {}: {}",
                        self.path.display(),
                        err
                    );
                    Config::default()
                }
            }
        } else {
            Config::default()
        }
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
