use serde::{Deserialize, Serialize};

use super::validate::{ensure, ensure_ipv4};
use super::{ConfigDomain, ConfigResource, ValidationError};

/// Access point the robot opens for direct connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApConfig {
    pub enable: bool,
    pub ssid: String,
    pub password: String,
    pub ip: String,
}

/// Station mode: the robot joins an existing network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaConfig {
    pub enable: bool,
    pub ssid: String,
    pub password: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WifiConfig {
    pub ap: ApConfig,
    pub sta: StaConfig,
}

fn validate_interface(
    enable: bool,
    ssid: &str,
    password: &str,
    ip: &str,
) -> Result<(), ValidationError> {
    ensure_ipv4("ip", ip)?;
    if !enable {
        return Ok(());
    }
    ensure(!ssid.trim().is_empty(), "ssid", || {
        "required when the interface is enabled".into()
    })?;
    ensure((8..=63).contains(&password.chars().count()), "password", || {
        "must be 8 to 63 characters".into()
    })
}

impl ConfigResource for WifiConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Wifi;

    fn validate(&self) -> Result<(), ValidationError> {
        let ap = &self.ap;
        validate_interface(ap.enable, &ap.ssid, &ap.password, &ap.ip).map_err(|e| e.within("ap"))?;
        let sta = &self.sta;
        validate_interface(sta.enable, &sta.ssid, &sta.password, &sta.ip)
            .map_err(|e| e.within("sta"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi() -> WifiConfig {
        WifiConfig {
            ap: ApConfig {
                enable: true,
                ssid: "raybot".into(),
                password: "raybot-ap".into(),
                ip: "192.168.4.1".into(),
            },
            sta: StaConfig {
                enable: false,
                ssid: String::new(),
                password: String::new(),
                ip: String::new(),
            },
        }
    }

    #[test]
    fn disabled_station_may_be_blank() {
        assert!(wifi().validate().is_ok());
    }

    #[test]
    fn enabled_station_needs_credentials() {
        let mut config = wifi();
        config.sta.enable = true;
        assert_eq!(config.validate().unwrap_err().field, "sta.ssid");

        config.sta.ssid = "warehouse".into();
        config.sta.password = "short".into();
        assert_eq!(config.validate().unwrap_err().field, "sta.password");

        config.sta.password = "long-enough".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_ip_is_rejected_even_when_disabled() {
        let mut config = wifi();
        config.sta.ip = "10.0.0".into();
        assert_eq!(config.validate().unwrap_err().field, "sta.ip");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<WifiConfig>(
            r#"{"ap": {"enable": false, "ssid": "", "password": "", "ip": "", "channel": 6},
                "sta": {"enable": false, "ssid": "", "password": "", "ip": ""}}"#,
        );
        assert!(result.is_err());
    }
}
