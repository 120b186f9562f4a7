// EPMC hardware plugin: two wheel motors behind one serial motor controller
//
// Validates the joint layout at init, owns the controller link, and moves
// measured/commanded wheel velocities across it once per control cycle.

use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Span};

use crate::config::{BAUD_RATE, CONNECT_TIMEOUT_MS, EpmcConfig, SETTLE_STEP, SETTLE_STEPS};
use crate::error::{HardwareError, Result};
use crate::hardware::{
    init_base, CommandInterface, ComponentInfo, HardwareInfo, ReadStatus, StateInterface,
    SystemInterface, HW_IF_POSITION, HW_IF_VELOCITY,
};
use crate::motor::{ControllerLink, EpmcSerial, MotorRecord};

/// Differential-drive hardware interface for an EPMC board
pub struct EpmcHardwareInterface<L: ControllerLink = EpmcSerial> {
    link: L,
    config: Option<EpmcConfig>,
    motor_a: MotorRecord,
    motor_b: MotorRecord,
    settle_step: Duration,
    sleep: Box<dyn FnMut(Duration) + Send>,
    span: Span,
}

impl EpmcHardwareInterface<EpmcSerial> {
    pub fn new() -> Self {
        Self::with_link(EpmcSerial::new())
    }
}

impl Default for EpmcHardwareInterface<EpmcSerial> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ControllerLink> EpmcHardwareInterface<L> {
    /// Create an adapter over any controller link
    pub fn with_link(link: L) -> Self {
        Self {
            link,
            config: None,
            motor_a: MotorRecord::default(),
            motor_b: MotorRecord::default(),
            settle_step: SETTLE_STEP,
            sleep: Box::new(thread::sleep),
            span: Span::none(),
        }
    }

    /// Override the length of each settle step taken after connecting
    pub fn with_settle_step(mut self, step: Duration) -> Self {
        self.settle_step = step;
        self
    }

    /// Replace the blocking sleep used between settle steps
    pub fn with_sleep(mut self, sleep: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Log under the given span instead of one named after the hardware
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn motors(&self) -> (&MotorRecord, &MotorRecord) {
        (&self.motor_a, &self.motor_b)
    }

    fn config(&self) -> Result<&EpmcConfig> {
        self.config.as_ref().ok_or(HardwareError::NotInitialized)
    }

    fn stop_motors(&mut self) -> Result<()> {
        self.link.send_target_vel(0.0, 0.0)?;
        Ok(())
    }
}

/// Check one joint has a single velocity command and position, velocity states
fn validate_joint(joint: &ComponentInfo) -> Result<()> {
    if joint.command_interfaces.len() != 1 {
        return Err(HardwareError::CommandInterfaceCount {
            joint: joint.name.clone(),
            found: joint.command_interfaces.len(),
        });
    }

    if joint.command_interfaces[0].name != HW_IF_VELOCITY {
        return Err(HardwareError::CommandInterfaceKind {
            joint: joint.name.clone(),
            found: joint.command_interfaces[0].name.clone(),
            expected: HW_IF_VELOCITY,
        });
    }

    if joint.state_interfaces.len() != 2 {
        return Err(HardwareError::StateInterfaceCount {
            joint: joint.name.clone(),
            found: joint.state_interfaces.len(),
        });
    }

    if joint.state_interfaces[0].name != HW_IF_POSITION {
        return Err(HardwareError::FirstStateInterface {
            joint: joint.name.clone(),
            found: joint.state_interfaces[0].name.clone(),
            expected: HW_IF_POSITION,
        });
    }

    if joint.state_interfaces[1].name != HW_IF_VELOCITY {
        return Err(HardwareError::SecondStateInterface {
            joint: joint.name.clone(),
            found: joint.state_interfaces[1].name.clone(),
            expected: HW_IF_VELOCITY,
        });
    }

    Ok(())
}

impl<L: ControllerLink> SystemInterface for EpmcHardwareInterface<L> {
    fn on_init(&mut self, info: &HardwareInfo) -> Result<()> {
        if self.span.is_none() {
            self.span = info_span!("epmc_hw", hardware = %info.name);
        }
        let _enter = self.span.enter();

        let info = init_base(info)?;
        let config = EpmcConfig::from_parameters(&info.hardware_parameters)?;

        self.motor_a = MotorRecord::new(&config.motor_a_name);
        self.motor_b = MotorRecord::new(&config.motor_b_name);
        self.config = Some(config);

        for joint in &info.joints {
            if let Err(e) = validate_joint(joint) {
                error!("{}", e);
                return Err(e);
            }
        }

        Ok(())
    }

    fn export_state_interfaces(&self) -> Vec<StateInterface> {
        let mut interfaces = Vec::with_capacity(4);
        interfaces.extend(self.motor_a.state_interfaces());
        interfaces.extend(self.motor_b.state_interfaces());
        interfaces
    }

    fn export_command_interfaces(&self) -> Vec<CommandInterface> {
        vec![
            self.motor_a.command_interface(),
            self.motor_b.command_interface(),
        ]
    }

    fn on_configure(&mut self) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();
        info!("Configuring ...please wait...");

        let config = self.config()?.clone();

        if self.link.connected() {
            self.link.disconnect();
        }
        self.link.connect(
            &config.port,
            BAUD_RATE,
            Duration::from_millis(CONNECT_TIMEOUT_MS),
        )?;

        // Wait for the controller to finish booting
        for i in 1..=SETTLE_STEPS {
            (self.sleep)(self.settle_step);
            info!("configuring controller: {} sec", i);
        }

        self.stop_motors()?;

        let cmd_timeout = config.cmd_timeout_ms()?;
        self.link.set_cmd_timeout(cmd_timeout)?;
        let effective = self.link.get_cmd_timeout()?;
        info!("motor_cmd_timeout_ms: {} ms", effective);

        info!("Successfully configured!");
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        let _enter = self.span.enter();
        info!("Cleaning up ...please wait...");
        if self.link.connected() {
            self.link.disconnect();
        }
        info!("Successfully cleaned up!");
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();
        info!("Activating ...please wait...");
        if !self.link.connected() {
            error!("Cannot activate: motor controller is not connected");
            return Err(HardwareError::NotConnected);
        }

        self.stop_motors()?;
        info!("Successfully Activated");
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();
        info!("Deactivating ...please wait...");

        // Stop regardless of what the link reports
        if let Err(e) = self.stop_motors() {
            warn!("Failed to stop motors on deactivate: {}", e);
        }
        self.motor_a.cmd_ang_vel.set(0.0);
        self.motor_b.cmd_ang_vel.set(0.0);

        info!("Successfully Deactivated!");
        Ok(())
    }

    fn read(&mut self, _period: Duration) -> Result<ReadStatus> {
        if !self.link.connected() {
            return Err(HardwareError::NotConnected);
        }

        let fetched = self
            .link
            .get_motors_pos()
            .and_then(|pos| Ok((pos, self.link.get_motors_vel()?)));

        match fetched {
            Ok(((pos_a, pos_b), (vel_a, vel_b))) => {
                self.motor_a.update(pos_a, vel_a);
                self.motor_b.update(pos_b, vel_b);
                Ok(ReadStatus::Fresh)
            }
            Err(e) => {
                let _enter = self.span.enter();
                warn!("Failed to read motor state, keeping last values: {}", e);
                Ok(ReadStatus::Stale)
            }
        }
    }

    fn write(&mut self, _period: Duration) -> Result<()> {
        if !self.link.connected() {
            return Err(HardwareError::NotConnected);
        }

        let cmd_a = self.motor_a.command();
        let cmd_b = self.motor_b.command();
        debug!("Target velocities: a={}, b={}", cmd_a, cmd_b);
        self.link.send_target_vel(cmd_a, cmd_b)?;
        Ok(())
    }
}
