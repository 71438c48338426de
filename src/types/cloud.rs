use serde::{Deserialize, Serialize};

use super::validate::ensure;
use super::{ConfigDomain, ConfigResource, ValidationError};

/// Connection to the fleet management cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConfig {
    pub enable: bool,
    /// `host:port` of the cloud gRPC endpoint.
    pub address: String,
    pub token: String,
}

impl ConfigResource for CloudConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Cloud;

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.enable {
            return Ok(());
        }
        ensure(!self.address.trim().is_empty(), "address", || {
            "required when cloud is enabled".into()
        })?;
        let has_port = self
            .address
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        ensure(has_port, "address", || {
            format!("'{}' must be in host:port form", self.address)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enable: bool, address: &str) -> CloudConfig {
        CloudConfig {
            enable,
            address: address.into(),
            token: "secret".into(),
        }
    }

    #[test]
    fn disabled_cloud_accepts_empty_address() {
        assert!(config(false, "").validate().is_ok());
    }

    #[test]
    fn enabled_cloud_requires_host_and_port() {
        assert_eq!(config(true, "").validate().unwrap_err().field, "address");
        assert!(config(true, "cloud.example.com").validate().is_err());
        assert!(config(true, "cloud.example.com:grpc").validate().is_err());
        assert!(config(true, ":50051").validate().is_err());
        assert!(config(true, "cloud.example.com:50051").validate().is_ok());
    }
}
