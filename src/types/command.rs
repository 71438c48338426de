use serde::{Deserialize, Serialize};

use super::validate::ensure;
use super::{ConfigDomain, ConfigResource, ValidationError};

/// Tuning for the robot's command executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    pub cargo_lift: CargoLiftConfig,
    pub cargo_lower: CargoLowerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CargoLiftConfig {
    /// Consecutive equal position readings before the lift counts as stopped.
    pub stable_read_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CargoLowerConfig {
    pub stable_read_count: u8,
    pub bottom_obstacle_tracking: ObstacleTracking,
}

/// Hysteresis for the bottom distance sensor, in centimeters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObstacleTracking {
    pub enter_distance: u16,
    pub exit_distance: u16,
}

impl ConfigResource for CommandConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Command;

    fn validate(&self) -> Result<(), ValidationError> {
        ensure(
            self.cargo_lift.stable_read_count >= 1,
            "cargo_lift.stable_read_count",
            || "must be at least 1".into(),
        )?;

        let lower = &self.cargo_lower;
        ensure(
            lower.stable_read_count >= 1,
            "cargo_lower.stable_read_count",
            || "must be at least 1".into(),
        )?;

        let tracking = &lower.bottom_obstacle_tracking;
        ensure(
            tracking.exit_distance >= tracking.enter_distance,
            "cargo_lower.bottom_obstacle_tracking.exit_distance",
            || {
                format!(
                    "{} is below enter_distance {}",
                    tracking.exit_distance, tracking.enter_distance
                )
            },
        )
    }
}
