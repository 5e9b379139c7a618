//! Error types for ZFM protocol operations.

use thiserror::Error;

/// Result type alias for ZFM operations.
pub type Result<T> = std::result::Result<T, ZfmError>;

/// Error types for ZFM fingerprint module communication.
///
/// Device-reported conditions (non-zero confirmation codes) are NOT errors in
/// this sense; they travel in-band as [`ConfirmationCode`](crate::types::ConfirmationCode)
/// values. These variants cover the exceptional channel only: link failures and
/// byte sequences that cannot be parsed as an acknowledgement at all.
#[derive(Error, Debug)]
pub enum ZfmError {
    /// Serial port communication error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error on the underlying link
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Received bytes do not form a valid acknowledgement frame.
    ///
    /// Covers short/empty reads (timeout before any response) as well as
    /// frames whose packet-kind byte is not the acknowledgement tag.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}
