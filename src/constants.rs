//! Protocol constants for ZFM fingerprint module communication.
//!
//! This module defines the fixed wire-format bytes of the 0xEF01 packet
//! protocol along with timing parameters and serial port configuration.

/// Fixed frame header, high byte transmitted first
pub const HEADER: [u8; 2] = [0xEF, 0x01];

/// Module address (factory default, broadcast)
pub const ADDRESS: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Default baud rate (57600 bps)
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Window for collecting an acknowledgement after a command, in milliseconds
pub const REPLY_TIMEOUT_MS: u64 = 1_000;

/// Sleep between input-drain polls while waiting for a reply
pub const POLL_INTERVAL_MS: u64 = 10;

/// Per-read timeout handed to the serial driver; the effective wait is the
/// polling loop in the transport, not this value
pub const PORT_READ_TIMEOUT_MS: u64 = 100;

/// Pause during enrolment for the finger to be lifted and replaced
pub const FINGER_LIFT_DELAY_MS: u64 = 1_500;

/// Shortest well-formed acknowledgement frame:
/// header (2) + address (4) + kind (1) + length (2) + code (1) + checksum (2)
pub const MIN_ACK_LEN: usize = 12;

/// Offset of the packet-kind byte within a frame
pub const KIND_OFFSET: usize = 6;

/// Offset of the big-endian length field within a frame
pub const LEN_OFFSET: usize = 7;

/// Offset of the first payload byte within a frame
pub const PAYLOAD_OFFSET: usize = 9;
