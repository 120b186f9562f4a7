// Serial settings, settle timing, parameter keys and the adapter configuration
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{HardwareError, Result};

// Serial link to the EPMC board
pub const BAUD_RATE: u32 = 115_200;
pub const CONNECT_TIMEOUT_MS: u64 = 100;

// The board needs a few seconds after the port opens before it accepts commands
pub const SETTLE_STEPS: u32 = 6;
pub const SETTLE_STEP: Duration = Duration::from_secs(1);

// Name the plugin is registered under
pub const PLUGIN_NAME: &str = "epmc_hw_plugin/EpmcHardwareInterface";

// Hardware parameter keys
pub const PARAM_MOTOR_A_NAME: &str = "motorA_wheel_name";
pub const PARAM_MOTOR_B_NAME: &str = "motorB_wheel_name";
pub const PARAM_PORT: &str = "port";
pub const PARAM_CMD_VEL_TIMEOUT_MS: &str = "cmd_vel_timeout_ms";

/// Adapter configuration extracted from the hardware parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpmcConfig {
    pub motor_a_name: String,
    pub motor_b_name: String,
    pub port: String,
    /// Kept as given; parsed when the board is configured.
    pub cmd_vel_timeout_ms: String,
}

impl EpmcConfig {
    /// Extract the four required keys. There are no defaults.
    pub fn from_parameters(params: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            motor_a_name: required(params, PARAM_MOTOR_A_NAME)?,
            motor_b_name: required(params, PARAM_MOTOR_B_NAME)?,
            port: required(params, PARAM_PORT)?,
            cmd_vel_timeout_ms: required(params, PARAM_CMD_VEL_TIMEOUT_MS)?,
        })
    }

    /// Parse the command watchdog timeout in milliseconds
    pub fn cmd_timeout_ms(&self) -> Result<u32> {
        self.cmd_vel_timeout_ms
            .trim()
            .parse()
            .map_err(|source| HardwareError::InvalidTimeout {
                value: self.cmd_vel_timeout_ms.clone(),
                source,
            })
    }
}

fn required(params: &HashMap<String, String>, key: &str) -> Result<String> {
    params
        .get(key)
        .cloned()
        .ok_or_else(|| HardwareError::MissingParameter(key.to_string()))
}
