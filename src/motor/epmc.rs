// EPMC (Easy PID Motor Controller) serial protocol client
//
// Packet format: [0xBB, Command, Length, Payload..., Checksum]
// Payload values are little-endian f32. Checksum is the low byte of the sum
// of every preceding byte, start byte included.
//
// This layout has not been checked against EPMC firmware. The command timeout
// travels as an f32 too, so values above 2^24 ms lose precision.

use serialport::{self, ClearBuffer, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, info};

use super::link::{ControllerLink, LinkError, Result};

/// Packet start byte
const START_BYTE: u8 = 0xBB;

/// Command set
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    WriteVel = 0x01,
    ReadPos = 0x03,
    ReadVel = 0x04,
    SetCmdTimeout = 0x06,
    GetCmdTimeout = 0x07,
}

/// Serial client for an EPMC board driving two motors
#[derive(Default)]
pub struct EpmcSerial {
    port: Option<Box<dyn SerialPort>>,
}

impl EpmcSerial {
    /// Create a disconnected client
    pub fn new() -> Self {
        Self::default()
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(LinkError::NotConnected)
    }

    /// Send a command that the board does not answer
    fn send(&mut self, command: Command, values: &[f32]) -> Result<()> {
        let packet = build_packet(command, values);
        debug!("Send {:?}: {:?}", command, values);
        let port = self.port()?;
        port.write_all(&packet)?;
        port.flush()?;
        Ok(())
    }

    /// Send a request and read back `count` values from the response
    fn request(&mut self, command: Command, count: usize) -> Result<Vec<f32>> {
        let packet = build_packet(command, &[]);
        let port = self.port()?;

        // Drop anything left over from an earlier, abandoned exchange
        port.clear(ClearBuffer::Input)?;
        port.write_all(&packet)?;
        port.flush()?;

        let payload = read_frame(port, command as u8)?;
        let values = decode_values(command as u8, &payload, count)?;
        debug!("Response {:?}: {:?}", command, values);
        Ok(values)
    }

    fn request_pair(&mut self, command: Command) -> Result<(f32, f32)> {
        let values = self.request(command, 2)?;
        Ok((values[0], values[1]))
    }
}

impl ControllerLink for EpmcSerial {
    fn connect(&mut self, port: &str, baud_rate: u32, timeout: Duration) -> Result<()> {
        info!("Opening motor controller on {} at {} baud", port, baud_rate);
        let handle = serialport::new(port, baud_rate).timeout(timeout).open()?;
        self.port = Some(handle);
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.port.take().is_some() {
            info!("Closed motor controller port");
        }
    }

    fn connected(&self) -> bool {
        self.port.is_some()
    }

    fn send_target_vel(&mut self, vel_a: f32, vel_b: f32) -> Result<()> {
        self.send(Command::WriteVel, &[vel_a, vel_b])
    }

    fn get_motors_pos(&mut self) -> Result<(f32, f32)> {
        self.request_pair(Command::ReadPos)
    }

    fn get_motors_vel(&mut self) -> Result<(f32, f32)> {
        self.request_pair(Command::ReadVel)
    }

    fn set_cmd_timeout(&mut self, timeout_ms: u32) -> Result<()> {
        self.send(Command::SetCmdTimeout, &[timeout_ms as f32])
    }

    fn get_cmd_timeout(&mut self) -> Result<u32> {
        let values = self.request(Command::GetCmdTimeout, 1)?;
        Ok(values[0].round() as u32)
    }
}

/// Calculate checksum over a packet prefix
fn checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| b as u32).sum();
    (sum & 0xFF) as u8
}

/// Build a packet with start byte, length and checksum
fn build_packet(command: Command, values: &[f32]) -> Vec<u8> {
    let length = (values.len() * 4) as u8;
    let mut packet = Vec::with_capacity(4 + values.len() * 4);

    packet.push(START_BYTE);
    packet.push(command as u8);
    packet.push(length);
    for value in values {
        packet.extend_from_slice(&value.to_le_bytes());
    }
    packet.push(checksum(&packet));

    packet
}

/// Read one response frame and return its payload
fn read_frame<R: Read + ?Sized>(reader: &mut R, command: u8) -> Result<Vec<u8>> {
    let mut header = [0u8; 3];
    read_exact(reader, &mut header, command)?;

    if header[0] != START_BYTE {
        return Err(LinkError::InvalidResponse {
            command,
            reason: format!("Invalid start byte: {:02X}", header[0]),
        });
    }

    if header[1] != command {
        return Err(LinkError::InvalidResponse {
            command,
            reason: format!("Command mismatch: expected {:02X}, got {:02X}", command, header[1]),
        });
    }

    // Payload plus trailing checksum
    let length = header[2] as usize;
    let mut remaining = vec![0u8; length + 1];
    read_exact(reader, &mut remaining, command)?;

    let mut checked = header.to_vec();
    checked.extend_from_slice(&remaining[..length]);
    if checksum(&checked) != remaining[length] {
        return Err(LinkError::ChecksumMismatch { command });
    }

    remaining.truncate(length);
    Ok(remaining)
}

/// Fill `buf`, reporting a serial timeout as such
fn read_exact<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8], command: u8) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::TimedOut {
            LinkError::Timeout { command }
        } else {
            LinkError::Io(e)
        }
    })
}

/// Decode exactly `count` little-endian f32 values
fn decode_values(command: u8, payload: &[u8], count: usize) -> Result<Vec<f32>> {
    if payload.len() != count * 4 {
        return Err(LinkError::InvalidResponse {
            command,
            reason: format!("Expected {} bytes, got {}", count * 4, payload.len()),
        });
    }

    Ok(payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
