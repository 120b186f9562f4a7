// Recording controller link for tests

use std::time::Duration;

use super::link::{ControllerLink, LinkError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect {
        port: String,
        baud_rate: u32,
        timeout: Duration,
    },
    Disconnect,
    SendTargetVel(f32, f32),
    GetMotorsPos,
    GetMotorsVel,
    SetCmdTimeout(u32),
    GetCmdTimeout,
}

#[derive(Debug, Default)]
pub struct MockLink {
    pub calls: Vec<Call>,
    pub is_connected: bool,
    pub positions: (f32, f32),
    pub velocities: (f32, f32),
    pub cmd_timeout_ms: u32,
    /// Fail the next fetch of positions or velocities
    pub fail_fetch: bool,
    pub refuse_connect: bool,
}

impl MockLink {
    pub fn online() -> Self {
        Self {
            is_connected: true,
            ..Default::default()
        }
    }

    pub fn sent_velocities(&self) -> Vec<(f32, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SendTargetVel(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.is_connected {
            Ok(())
        } else {
            Err(LinkError::NotConnected)
        }
    }

    fn fetch(&mut self, command: u8) -> Result<()> {
        self.check()?;
        if self.fail_fetch {
            self.fail_fetch = false;
            return Err(LinkError::Timeout { command });
        }
        Ok(())
    }
}

impl ControllerLink for MockLink {
    fn connect(&mut self, port: &str, baud_rate: u32, timeout: Duration) -> Result<()> {
        self.calls.push(Call::Connect {
            port: port.to_string(),
            baud_rate,
            timeout,
        });
        if self.refuse_connect {
            return Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such port",
            )));
        }
        self.is_connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.calls.push(Call::Disconnect);
        self.is_connected = false;
    }

    fn connected(&self) -> bool {
        self.is_connected
    }

    fn send_target_vel(&mut self, vel_a: f32, vel_b: f32) -> Result<()> {
        self.calls.push(Call::SendTargetVel(vel_a, vel_b));
        self.check()
    }

    fn get_motors_pos(&mut self) -> Result<(f32, f32)> {
        self.calls.push(Call::GetMotorsPos);
        self.fetch(0x03)?;
        Ok(self.positions)
    }

    fn get_motors_vel(&mut self) -> Result<(f32, f32)> {
        self.calls.push(Call::GetMotorsVel);
        self.fetch(0x04)?;
        Ok(self.velocities)
    }

    fn set_cmd_timeout(&mut self, timeout_ms: u32) -> Result<()> {
        self.calls.push(Call::SetCmdTimeout(timeout_ms));
        self.check()?;
        self.cmd_timeout_ms = timeout_ms;
        Ok(())
    }

    fn get_cmd_timeout(&mut self) -> Result<u32> {
        self.calls.push(Call::GetCmdTimeout);
        self.check()?;
        Ok(self.cmd_timeout_ms)
    }
}
