//! Byte-level link abstraction.
//!
//! [`Transport`] is the seam between the command client and the physical
//! serial line. The production implementation is [`SerialTransport`]; tests
//! script the device side with an in-memory implementation.

use crate::constants::{DEFAULT_BAUD_RATE, POLL_INTERVAL_MS, PORT_READ_TIMEOUT_MS};
use crate::error::Result;
use log::trace;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Half-duplex byte link to the module.
///
/// One command is in flight at a time, so the contract is simple: write a
/// whole frame, then collect whatever the device says within a bounded
/// window. `receive` is a fixed-duration slurp, not a length-aware read --
/// the caller recognizes (or rejects) a complete frame in the result.
pub trait Transport {
    /// Write all bytes to the link.
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Drain incoming bytes until `timeout` elapses, returning everything
    /// accumulated. An empty result means the device stayed silent.
    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>>;

    /// Discard residual input so a stale reply cannot leak into the next
    /// decode.
    fn clear_input(&mut self) -> Result<()>;
}

/// [`Transport`] over a real serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    poll_interval: Duration,
}

impl SerialTransport {
    /// Open `port_name` at the given baud rate.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(PORT_READ_TIMEOUT_MS))
            .open()?;
        Ok(SerialTransport {
            port,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        })
    }

    /// Open `port_name` at the default 57600 baud.
    pub fn open_default(port_name: &str) -> Result<Self> {
        Self::open(port_name, DEFAULT_BAUD_RATE)
    }

    /// Override the sleep between input-drain polls.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// List serial ports visible to the OS.
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        trace!("TX {}", hex_dump(bytes));
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut buf = Vec::new();
        let mut chunk = [0u8; 64];

        while Instant::now() < deadline {
            let available = self.port.bytes_to_read()? as usize;
            if available > 0 {
                let want = available.min(chunk.len());
                let got = self.port.read(&mut chunk[..want])?;
                buf.extend_from_slice(&chunk[..got]);
            } else {
                thread::sleep(self.poll_interval);
            }
        }

        trace!("RX {}", hex_dump(&buf));
        Ok(buf)
    }

    fn clear_input(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}

pub(crate) fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
