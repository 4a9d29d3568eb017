//! Configuration loading and management
//!
//! Handles parsing of `kanban.toml` configuration files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::board::{Grouping, Sorting};
use crate::error::{Error, Result};
use crate::prefs::Preferences;

pub const CONFIG_FILE_NAME: &str = "kanban.toml";
pub const PREFERENCES_FILE_NAME: &str = "preferences.toml";
pub const DEFAULT_ENDPOINT: &str = "https://api.quicksell.co/v1/internal/frontend-assignment";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Board data source
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Preference persistence and defaults
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Board data endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// URL returning `{ tickets, users }`
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Preference file location (defaults to the platform config dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Grouping used before anything has been chosen
    #[serde(default = "default_grouping")]
    pub default_grouping: String,

    /// Sorting used before anything has been chosen
    #[serde(default = "default_sorting")]
    pub default_sorting: String,
}

fn default_grouping() -> String {
    Grouping::default().as_str().to_string()
}

fn default_sorting() -> String {
    Sorting::default().as_str().to_string()
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_grouping: default_grouping(),
            default_sorting: default_sorting(),
        }
    }
}

impl PreferencesConfig {
    /// Defaults as typed preferences. Values were checked by `validate`.
    pub fn defaults(&self) -> Preferences {
        Preferences {
            grouping: Grouping::parse_or_default(&self.default_grouping),
            sorting: Sorting::parse_or_default(&self.default_sorting),
        }
    }

    fn validate(&self) -> Result<()> {
        self.default_grouping
            .parse::<Grouping>()
            .map_err(|err| Error::InvalidConfig(format!("preferences.default_grouping: {err}")))?;
        self.default_sorting
            .parse::<Sorting>()
            .map_err(|err| Error::InvalidConfig(format!("preferences.default_sorting: {err}")))?;
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "preferences.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl EndpointConfig {
    fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(self.url.trim()).map_err(|err| {
            Error::InvalidConfig(format!("endpoint.url: invalid url '{}': {err}", self.url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "endpoint.url: unsupported scheme '{}' (expected http|https)",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "endpoint.timeout_secs must be > 0".to_string(),
            ));
        }
        if self.timeout_secs > 600 {
            return Err(Error::InvalidConfig(
                "endpoint.timeout_secs must be <= 600".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `kanban.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `kanban.toml` from `dir`, or return defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config file: explicit path, else the platform config dir
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match config_dir() {
                Some(dir) => Self::load_from_dir(&dir),
                None => Ok(Self::default()),
            },
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where the preference file lives for this configuration
    pub fn preferences_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.preferences.path {
            return Ok(path.clone());
        }
        config_dir()
            .map(|dir| dir.join(PREFERENCES_FILE_NAME))
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "no home directory found; set preferences.path or --prefs".to_string(),
                )
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint.validate()?;
        self.preferences.validate()?;
        Ok(())
    }
}

/// Platform config directory for kanban, if a home directory exists
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kanban").map(|dirs| dirs.config_dir().to_path_buf())
}
