//! Settings of the CLI itself: where the robot's API lives and how to talk to it.
//!
//! Precedence: command-line flag > environment > config file > defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::QueryPluginOptions;
use crate::http::DEFAULT_USER_AGENT;

pub const ENV_API_URL: &str = "RAYBOT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "RAYBOT_TIMEOUT_SECS";
pub const ENV_CONFIG_DIR: &str = "RAYBOT_CONFIG_DIR";

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const FALLBACK_CONFIG_DIR: &str = "~/.config";
const CONFIG_SUBDIR: &str = "raybot";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// On-disk form; every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub query: Option<QueryPluginOptions>,
}

impl SettingsFile {
    /// A missing file is an empty one.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        tracing::trace!(path = %path.display(), "Loading settings file");

        if !path.exists() {
            tracing::trace!("Settings file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub query: QueryPluginOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            query: QueryPluginOptions::default(),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment and the default file.
    pub fn load(api_url_flag: Option<&str>) -> Result<Self, SettingsError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        let path = config_dir_with(&env).join(CONFIG_FILE);
        Self::resolve(&path, env, api_url_flag)
    }

    /// Resolve settings with an explicit file path and environment lookup.
    pub fn resolve(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
        api_url_flag: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let file = SettingsFile::load(path)?;
        let defaults = Self::default();

        let api_url = api_url_flag
            .map(str::to_string)
            .or_else(|| env(ENV_API_URL))
            .or(file.api_url)
            .unwrap_or(defaults.api_url);
        validate_url(&api_url)?;

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| SettingsError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(SettingsError::InvalidValue {
                key: "timeout_secs",
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }

        let settings = Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            query: file.query.unwrap_or(defaults.query),
        };
        tracing::trace!(?settings, "Settings resolved");
        Ok(settings)
    }
}

/// $RAYBOT_CONFIG_DIR or ~/.config/raybot
pub fn config_dir() -> PathBuf {
    config_dir_with(&|key: &str| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

fn config_dir_with(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let dir = env(ENV_CONFIG_DIR).map(PathBuf::from).unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_DIR))
            .join(CONFIG_SUBDIR)
    });
    tracing::trace!(dir = %dir.display(), "Resolved config directory");
    dir
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn validate_url(url: &str) -> Result<(), SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidValue {
        key: "api_url",
        value: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
