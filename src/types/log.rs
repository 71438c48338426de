use serde::{Deserialize, Serialize};

use super::{ConfigDomain, ConfigResource, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogFormat {
    Json,
    Text,
}

/// Logging of the robot's own services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include source file and line in each record.
    pub add_source: bool,
}

impl ConfigResource for LogConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Log;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
