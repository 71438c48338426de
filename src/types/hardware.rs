use serde::{Deserialize, Serialize};

use super::validate::ensure;
use super::{ConfigDomain, ConfigResource, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
    /// Milliseconds.
    pub read_timeout: u64,
}

impl SerialConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure(!self.port.trim().is_empty(), "port", || "must not be empty".into())?;
        ensure(self.baud_rate > 0, "baud_rate", || "must be positive".into())?;
        ensure((5..=8).contains(&self.data_bits), "data_bits", || {
            format!("{} is not one of 5, 6, 7, 8", self.data_bits)
        })?;
        ensure(matches!(self.stop_bits, 1 | 2), "stop_bits", || {
            format!("{} is not one of 1, 2", self.stop_bits)
        })
    }
}

/// A microcontroller attached over a serial line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialDeviceConfig {
    pub serial: SerialConfig,
    /// Wait for the device to acknowledge each command.
    pub enable_ack: bool,
    /// Milliseconds to wait for an acknowledgement.
    pub command_ack_timeout: u64,
}

impl SerialDeviceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.serial.validate().map_err(|e| e.within("serial"))?;
        ensure(
            !self.enable_ack || self.command_ack_timeout > 0,
            "command_ack_timeout",
            || "must be positive when enable_ack is set".into(),
        )
    }
}

/// Motor and sensor board.
pub type EspConfig = SerialDeviceConfig;
/// Drive and lift board.
pub type PicConfig = SerialDeviceConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HardwareConfig {
    pub esp: EspConfig,
    pub pic: PicConfig,
}

impl ConfigResource for HardwareConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Hardware;

    fn validate(&self) -> Result<(), ValidationError> {
        self.esp.validate().map_err(|e| e.within("esp"))?;
        self.pic.validate().map_err(|e| e.within("pic"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(port: &str) -> SerialDeviceConfig {
        SerialDeviceConfig {
            serial: SerialConfig {
                port: port.into(),
                baud_rate: 9600,
                data_bits: 8,
                stop_bits: 1,
                parity: Parity::None,
                read_timeout: 1000,
            },
            enable_ack: true,
            command_ack_timeout: 1000,
        }
    }

    fn hardware() -> HardwareConfig {
        HardwareConfig {
            esp: device("/dev/ttyUSB0"),
            pic: device("/dev/ttyUSB1"),
        }
    }

    #[test]
    fn default_wiring_is_valid() {
        assert!(hardware().validate().is_ok());
    }

    #[test]
    fn reports_nested_field_path() {
        let mut config = hardware();
        config.pic.serial.data_bits = 9;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "pic.serial.data_bits");
    }

    #[test]
    fn ack_timeout_only_matters_with_ack_enabled() {
        let mut config = hardware();
        config.esp.command_ack_timeout = 0;
        assert_eq!(
            config.validate().unwrap_err().field,
            "esp.command_ack_timeout"
        );

        config.esp.enable_ack = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn half_stop_bit_is_not_supported() {
        let mut config = hardware();
        config.esp.serial.stop_bits = 3;
        assert_eq!(config.validate().unwrap_err().field, "esp.serial.stop_bits");
    }
}
