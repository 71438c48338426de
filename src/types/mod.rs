//! Configuration records exchanged with the raybot API.
//!
//! Every domain is one explicit record type. Decoding into these types is
//! where structural mismatches are caught; [`ConfigResource::validate`]
//! checks value ranges on top of that.

mod cloud;
mod command;
mod hardware;
mod http;
mod log;
mod validate;
mod wifi;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cloud::CloudConfig;
pub use command::{CargoLiftConfig, CargoLowerConfig, CommandConfig, ObstacleTracking};
pub use hardware::{
    EspConfig, HardwareConfig, Parity, PicConfig, SerialConfig, SerialDeviceConfig,
};
pub use http::HttpConfig;
pub use log::{LogConfig, LogFormat, LogLevel};
pub use validate::ValidationError;
pub use wifi::{ApConfig, StaConfig, WifiConfig};

/// One of the independently managed configuration resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDomain {
    Log,
    Hardware,
    Cloud,
    Http,
    Wifi,
    Command,
}

impl ConfigDomain {
    pub const ALL: [ConfigDomain; 6] = [
        ConfigDomain::Log,
        ConfigDomain::Hardware,
        ConfigDomain::Cloud,
        ConfigDomain::Http,
        ConfigDomain::Wifi,
        ConfigDomain::Command,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Hardware => "hardware",
            Self::Cloud => "cloud",
            Self::Http => "http",
            Self::Wifi => "wifi",
            Self::Command => "command",
        }
    }

    /// API path of the resource, relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Log => "/configs/log",
            Self::Hardware => "/configs/hardware",
            Self::Cloud => "/configs/cloud",
            Self::Http => "/configs/http",
            Self::Wifi => "/configs/wifi",
            Self::Command => "/configs/command",
        }
    }
}

impl fmt::Display for ConfigDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown configuration domain '{0}' (expected one of: log, hardware, cloud, http, wifi, command)")]
pub struct UnknownDomain(pub String);

impl FromStr for ConfigDomain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// A record that is read and replaced as a whole under one [`ConfigDomain`].
pub trait ConfigResource:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    const DOMAIN: ConfigDomain;

    /// Check value ranges the wire format cannot express.
    fn validate(&self) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_has_a_distinct_path() {
        let mut paths: Vec<_> = ConfigDomain::ALL.iter().map(|d| d.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), ConfigDomain::ALL.len());

        for domain in ConfigDomain::ALL {
            assert_eq!(domain.path(), format!("/configs/{}", domain.name()));
        }
    }

    #[test]
    fn parses_domain_names_case_insensitively() {
        assert_eq!("wifi".parse::<ConfigDomain>(), Ok(ConfigDomain::Wifi));
        assert_eq!("HTTP".parse::<ConfigDomain>(), Ok(ConfigDomain::Http));
        assert_eq!(" Command ".parse::<ConfigDomain>(), Ok(ConfigDomain::Command));
    }

    #[test]
    fn rejects_unknown_domain() {
        let err = "battery".parse::<ConfigDomain>().unwrap_err();
        assert_eq!(err, UnknownDomain("battery".into()));
        assert!(err.to_string().contains("battery"));
    }

    #[test]
    fn resources_are_bound_to_their_domain() {
        assert_eq!(LogConfig::DOMAIN, ConfigDomain::Log);
        assert_eq!(HardwareConfig::DOMAIN, ConfigDomain::Hardware);
        assert_eq!(CloudConfig::DOMAIN, ConfigDomain::Cloud);
        assert_eq!(HttpConfig::DOMAIN, ConfigDomain::Http);
        assert_eq!(WifiConfig::DOMAIN, ConfigDomain::Wifi);
        assert_eq!(CommandConfig::DOMAIN, ConfigDomain::Command);
    }
}
