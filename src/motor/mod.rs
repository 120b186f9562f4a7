// Motor side of the plugin
//
// Provides:
// - The ControllerLink trait the adapter drives
// - EPMC serial protocol implementation
// - Per-motor records shared with exported interfaces

pub mod epmc;
mod link;
mod record;

#[cfg(test)]
pub(crate) mod mock;

pub use epmc::EpmcSerial;
pub use link::{ControllerLink, LinkError};
pub use record::MotorRecord;
