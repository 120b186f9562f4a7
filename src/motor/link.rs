// Controller link: the client side of the serial connection to the motor board
//
// The adapter only ever talks to this trait, so the serial client can be
// swapped for a recording mock in tests.

use std::time::Duration;

/// Error types for motor controller communication
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not connected to the motor controller")]
    NotConnected,

    #[error("Invalid response to command 0x{command:02X}: {reason}")]
    InvalidResponse { command: u8, reason: String },

    #[error("Checksum mismatch in response to command 0x{command:02X}")]
    ChecksumMismatch { command: u8 },

    #[error("Timeout waiting for response to command 0x{command:02X}")]
    Timeout { command: u8 },
}

pub type Result<T> = std::result::Result<T, LinkError>;

/// Blocking request/response client for a two-motor controller board.
///
/// All values are angular: rad for positions, rad/s for velocities.
pub trait ControllerLink: Send {
    /// Open the connection. An already open connection is replaced.
    fn connect(&mut self, port: &str, baud_rate: u32, timeout: Duration) -> Result<()>;

    /// Close the connection. Does nothing when already closed.
    fn disconnect(&mut self);

    fn connected(&self) -> bool;

    /// Send target angular velocities for motor A and motor B
    fn send_target_vel(&mut self, vel_a: f32, vel_b: f32) -> Result<()>;

    /// Measured angular positions (A, B)
    fn get_motors_pos(&mut self) -> Result<(f32, f32)>;

    /// Measured angular velocities (A, B)
    fn get_motors_vel(&mut self) -> Result<(f32, f32)>;

    /// Set the board's command watchdog: motors stop when no target arrives
    /// within `timeout_ms`.
    fn set_cmd_timeout(&mut self, timeout_ms: u32) -> Result<()>;

    fn get_cmd_timeout(&mut self) -> Result<u32>;
}
