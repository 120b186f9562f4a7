// Per-motor state held by the adapter

use crate::hardware::{
    CommandInterface, SharedValue, StateInterface, HW_IF_POSITION, HW_IF_VELOCITY,
};

/// Measured and commanded values for one wheel motor
#[derive(Debug, Clone, Default)]
pub struct MotorRecord {
    pub name: String,
    /// rad
    pub ang_pos: SharedValue,
    /// rad/s
    pub ang_vel: SharedValue,
    /// rad/s
    pub cmd_ang_vel: SharedValue,
}

impl MotorRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Position then velocity
    pub fn state_interfaces(&self) -> [StateInterface; 2] {
        [
            StateInterface::new(&self.name, HW_IF_POSITION, self.ang_pos.clone()),
            StateInterface::new(&self.name, HW_IF_VELOCITY, self.ang_vel.clone()),
        ]
    }

    pub fn command_interface(&self) -> CommandInterface {
        CommandInterface::new(&self.name, HW_IF_VELOCITY, self.cmd_ang_vel.clone())
    }

    /// Store a measurement from the controller
    pub fn update(&self, ang_pos: f32, ang_vel: f32) {
        self.ang_pos.set(ang_pos as f64);
        self.ang_vel.set(ang_vel as f64);
    }

    /// Command in the controller's precision
    pub fn command(&self) -> f32 {
        self.cmd_ang_vel.get() as f32
    }
}
