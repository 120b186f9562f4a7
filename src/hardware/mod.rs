// Host-side hardware contract
//
// Provides:
// - The SystemInterface trait every hardware plugin implements
// - Hardware descriptions and live interface handles
// - A lifecycle driver and a plugin registry

mod handle;
mod info;
pub mod lifecycle;
pub mod registry;

pub use handle::{CommandInterface, SharedValue, StateInterface};
pub use info::{
    init_base, ComponentInfo, HardwareInfo, InterfaceInfo, HW_IF_POSITION, HW_IF_VELOCITY,
};
pub use lifecycle::{HardwareComponent, LifecycleState};
pub use registry::HardwareRegistry;

use std::time::Duration;

use crate::error::Result;

/// Outcome of a successful read cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// All state values were refreshed
    Fresh,
    /// The fetch failed; state values are left as of the last fresh read
    Stale,
}

/// A hardware component driven by the host's lifecycle and control loop.
///
/// The host calls `on_init` once, exports interfaces, then walks the
/// configure/activate/deactivate/cleanup transitions. While active it calls
/// `read` then `write` once per control cycle.
pub trait SystemInterface: Send {
    fn on_init(&mut self, info: &HardwareInfo) -> Result<()>;

    fn export_state_interfaces(&self) -> Vec<StateInterface>;

    fn export_command_interfaces(&self) -> Vec<CommandInterface>;

    fn on_configure(&mut self) -> Result<()>;

    fn on_cleanup(&mut self) -> Result<()>;

    fn on_activate(&mut self) -> Result<()>;

    fn on_deactivate(&mut self) -> Result<()>;

    fn read(&mut self, period: Duration) -> Result<ReadStatus>;

    fn write(&mut self, period: Duration) -> Result<()>;
}
