use serde::{Deserialize, Serialize};

use super::validate::ensure;
use super::{ConfigDomain, ConfigResource, ValidationError};

/// The robot's own HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    pub port: u16,
    /// Serve the OpenAPI explorer.
    pub swagger: bool,
}

impl ConfigResource for HttpConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Http;

    fn validate(&self) -> Result<(), ValidationError> {
        ensure(self.port != 0, "port", || "must not be 0".into())
    }
}
