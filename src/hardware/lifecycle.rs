// Lifecycle driver for one hardware component
//
// Tracks the component's state and only forwards transitions that are legal
// from it. A failed callback leaves the state where it was.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use super::{
    CommandInterface, HardwareInfo, HardwareRegistry, ReadStatus, StateInterface, SystemInterface,
};
use crate::error::{HardwareError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unconfigured,
    /// Configured, not running
    Inactive,
    Active,
    Finalized,
}

pub struct HardwareComponent {
    name: String,
    system: Box<dyn SystemInterface>,
    state: LifecycleState,
    state_interfaces: HashMap<String, StateInterface>,
    command_interfaces: HashMap<String, CommandInterface>,
}

impl HardwareComponent {
    /// Instantiate the plugin named by `info`, initialize it and collect its interfaces
    pub fn load(registry: &HardwareRegistry, info: &HardwareInfo) -> Result<Self> {
        let system = registry.create(&info.plugin)?;
        Self::init(system, info)
    }

    /// Initialize an already constructed system
    pub fn init(mut system: Box<dyn SystemInterface>, info: &HardwareInfo) -> Result<Self> {
        system.on_init(info)?;

        let state_interfaces = system
            .export_state_interfaces()
            .into_iter()
            .map(|i| (i.full_name(), i))
            .collect();
        let command_interfaces = system
            .export_command_interfaces()
            .into_iter()
            .map(|i| (i.full_name(), i))
            .collect();

        info!("Loaded hardware '{}' ({})", info.name, info.plugin);
        Ok(Self {
            name: info.name.clone(),
            system,
            state: LifecycleState::Unconfigured,
            state_interfaces,
            command_interfaces,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Sorted full names of the exported state interfaces
    pub fn state_interface_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state_interfaces.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn command_interface_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.command_interfaces.keys().cloned().collect();
        names.sort();
        names
    }

    /// Current value of a state interface, e.g. "left_wheel_joint/position"
    pub fn state_value(&self, full_name: &str) -> Result<f64> {
        self.state_interfaces
            .get(full_name)
            .map(StateInterface::value)
            .ok_or_else(|| HardwareError::UnknownInterface(full_name.to_string()))
    }

    /// Set a command interface, e.g. "left_wheel_joint/velocity"
    pub fn set_command(&self, full_name: &str, value: f64) -> Result<()> {
        let command = self
            .command_interfaces
            .get(full_name)
            .ok_or_else(|| HardwareError::UnknownInterface(full_name.to_string()))?;
        command.set_value(value);
        Ok(())
    }

    fn transition(
        &mut self,
        name: &'static str,
        allowed: &[LifecycleState],
        target: LifecycleState,
        callback: fn(&mut Box<dyn SystemInterface>) -> Result<()>,
    ) -> Result<()> {
        if !allowed.contains(&self.state) {
            return Err(HardwareError::InvalidTransition {
                from: self.state,
                transition: name,
            });
        }

        callback(&mut self.system)?;
        info!("Hardware '{}': {:?} -> {:?}", self.name, self.state, target);
        self.state = target;
        Ok(())
    }

    pub fn configure(&mut self) -> Result<()> {
        use LifecycleState::*;
        self.transition("configure", &[Unconfigured, Inactive], Inactive, |s| {
            s.on_configure()
        })
    }

    pub fn cleanup(&mut self) -> Result<()> {
        use LifecycleState::*;
        self.transition("cleanup", &[Unconfigured, Inactive], Unconfigured, |s| {
            s.on_cleanup()
        })
    }

    pub fn activate(&mut self) -> Result<()> {
        use LifecycleState::*;
        self.transition("activate", &[Inactive], Active, |s| s.on_activate())
    }

    pub fn deactivate(&mut self) -> Result<()> {
        use LifecycleState::*;
        self.transition("deactivate", &[Active], Inactive, |s| s.on_deactivate())
    }

    /// Bring the component down from any state
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == LifecycleState::Finalized {
            return Ok(());
        }
        if self.state == LifecycleState::Active {
            self.deactivate()?;
        }
        if let Err(e) = self.cleanup() {
            warn!("Cleanup of '{}' failed during shutdown: {}", self.name, e);
            return Err(e);
        }
        self.state = LifecycleState::Finalized;
        Ok(())
    }

    fn require_active(&self, operation: &'static str) -> Result<()> {
        if self.state == LifecycleState::Active {
            Ok(())
        } else {
            Err(HardwareError::InvalidTransition {
                from: self.state,
                transition: operation,
            })
        }
    }

    pub fn read(&mut self, period: Duration) -> Result<ReadStatus> {
        self.require_active("read")?;
        self.system.read(period)
    }

    pub fn write(&mut self, period: Duration) -> Result<()> {
        self.require_active("write")?;
        self.system.write(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        PARAM_CMD_VEL_TIMEOUT_MS, PARAM_MOTOR_A_NAME, PARAM_MOTOR_B_NAME, PARAM_PORT,
    };
    use crate::hardware::ComponentInfo;
    use crate::motor::mock::MockLink;
    use crate::plugin::EpmcHardwareInterface;

    const PERIOD: Duration = Duration::from_millis(20);

    fn diffbot_info() -> HardwareInfo {
        HardwareInfo {
            name: "diffbot".to_string(),
            plugin: crate::config::PLUGIN_NAME.to_string(),
            hardware_parameters: [
                (PARAM_MOTOR_A_NAME, "left_wheel_joint"),
                (PARAM_MOTOR_B_NAME, "right_wheel_joint"),
                (PARAM_PORT, "/dev/ttyUSB0"),
                (PARAM_CMD_VEL_TIMEOUT_MS, "1000"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            joints: vec![
                ComponentInfo::new("left_wheel_joint", &["velocity"], &["position", "velocity"]),
                ComponentInfo::new("right_wheel_joint", &["velocity"], &["position", "velocity"]),
            ],
        }
    }

    fn component(link: MockLink) -> HardwareComponent {
        let system = EpmcHardwareInterface::with_link(link).with_settle_step(Duration::ZERO);
        HardwareComponent::init(Box::new(system), &diffbot_info()).unwrap()
    }

    #[test]
    fn test_interfaces_collected_at_init() {
        let hw = component(MockLink::default());
        assert_eq!(hw.name(), "diffbot");
        assert_eq!(hw.state(), LifecycleState::Unconfigured);
        assert_eq!(
            hw.state_interface_names(),
            vec![
                "left_wheel_joint/position",
                "left_wheel_joint/velocity",
                "right_wheel_joint/position",
                "right_wheel_joint/velocity",
            ]
        );
        assert_eq!(
            hw.command_interface_names(),
            vec!["left_wheel_joint/velocity", "right_wheel_joint/velocity"]
        );
        assert!(matches!(
            hw.state_value("left_wheel_joint/effort"),
            Err(HardwareError::UnknownInterface(_))
        ));
    }

    #[test]
    fn test_full_lifecycle() {
        let mut hw = component(MockLink::default());

        hw.configure().unwrap();
        assert_eq!(hw.state(), LifecycleState::Inactive);
        hw.activate().unwrap();
        assert_eq!(hw.state(), LifecycleState::Active);

        hw.set_command("left_wheel_joint/velocity", 2.0).unwrap();
        hw.set_command("right_wheel_joint/velocity", 1.0).unwrap();
        assert_eq!(hw.read(PERIOD).unwrap(), ReadStatus::Fresh);
        hw.write(PERIOD).unwrap();

        hw.deactivate().unwrap();
        assert_eq!(hw.state(), LifecycleState::Inactive);
        hw.activate().unwrap();
        hw.shutdown().unwrap();
        assert_eq!(hw.state(), LifecycleState::Finalized);
        // Shutting down twice is fine
        hw.shutdown().unwrap();
    }

    #[test]
    fn test_cycle_requires_active() {
        let mut hw = component(MockLink::online());
        assert!(matches!(
            hw.read(PERIOD),
            Err(HardwareError::InvalidTransition {
                from: LifecycleState::Unconfigured,
                transition: "read"
            })
        ));
        assert!(hw.write(PERIOD).is_err());
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut hw = component(MockLink::default());
        assert!(matches!(
            hw.activate(),
            Err(HardwareError::InvalidTransition { .. })
        ));
        assert!(hw.deactivate().is_err());
        assert_eq!(hw.state(), LifecycleState::Unconfigured);
    }

    #[test]
    fn test_failed_callback_keeps_state() {
        let link = MockLink {
            refuse_connect: true,
            ..Default::default()
        };
        let mut hw = component(link);
        assert!(matches!(hw.configure(), Err(HardwareError::Link(_))));
        assert_eq!(hw.state(), LifecycleState::Unconfigured);
    }

    #[test]
    fn test_load_from_registry() {
        let registry = HardwareRegistry::with_builtin();
        let hw = HardwareComponent::load(&registry, &diffbot_info()).unwrap();
        assert_eq!(hw.command_interface_names().len(), 2);

        let mut info = diffbot_info();
        info.plugin = "unknown/Plugin".to_string();
        assert!(matches!(
            HardwareComponent::load(&registry, &info),
            Err(HardwareError::UnknownPlugin(_))
        ));
    }

    #[test]
    fn test_load_reports_validation_error() {
        let mut info = diffbot_info();
        info.joints[1] =
            ComponentInfo::new("right_wheel_joint", &["position"], &["position", "velocity"]);
        let system = EpmcHardwareInterface::with_link(MockLink::default());
        assert!(matches!(
            HardwareComponent::init(Box::new(system), &info),
            Err(HardwareError::CommandInterfaceKind { .. })
        ));
    }

    #[test]
    fn test_unknown_command_interface() {
        let hw = component(MockLink::default());
        assert!(matches!(
            hw.set_command("back_wheel_joint/velocity", 1.0),
            Err(HardwareError::UnknownInterface(_))
        ));
    }
}
