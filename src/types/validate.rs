use std::net::Ipv4Addr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path with the enclosing section name.
    pub(crate) fn within(mut self, section: &str) -> Self {
        self.field = format!("{section}.{}", self.field);
        self
    }
}

pub(crate) fn ensure(
    ok: bool,
    field: &str,
    reason: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(field, reason()))
    }
}

/// Empty means "assigned by DHCP / default".
pub(crate) fn ensure_ipv4(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new(field, format!("'{value}' is not an IPv4 address")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_prefixes_field_path() {
        let err = ValidationError::new("baud_rate", "must be positive")
            .within("serial")
            .within("esp");
        assert_eq!(err.field, "esp.serial.baud_rate");
    }

    #[test]
    fn ipv4_accepts_empty_and_dotted_quads() {
        assert!(ensure_ipv4("ip", "").is_ok());
        assert!(ensure_ipv4("ip", "192.168.4.1").is_ok());
        assert!(ensure_ipv4("ip", "192.168.4").is_err());
        assert!(ensure_ipv4("ip", "fe80::1").is_err());
    }
}
