// EPMC hardware plugin
//
// Bridges a host's generic hardware lifecycle to a two-motor EPMC board on a
// serial port.

pub mod config;
pub mod error;
pub mod hardware;
pub mod motor;
pub mod plugin;

pub use error::{HardwareError, Result};
pub use plugin::EpmcHardwareInterface;
