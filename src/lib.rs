//! # ZFM Protocol Library
//!
//! A Rust library for driving ZFM-family fingerprint capture modules (GT-511C3
//! and compatible R30x-class sensors) over a half-duplex serial link, using the
//! fixed `0xEF01` binary request/acknowledgement protocol.
//!
//! ## Features
//!
//! - Pure packet codec: framing, checksum, confirmation-code decoding
//! - One client method per primitive device operation (capture, extract,
//!   fuse, store, load, search, compare, delete)
//! - Compound workflows (enrol, identify by search, identify by id, delete)
//!   with abort-on-first-failure sequencing
//! - Human-readable diagnostics for every documented confirmation code
//!
//! ## Example
//!
//! ```no_run
//! use zfm_protocol::{EnrollOutcome, Workflows, Zfm};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut zfm = Zfm::open("/dev/ttyUSB0")?;
//!     match Workflows::new(&mut zfm).enroll(7)? {
//!         EnrollOutcome::Stored { page_id } => println!("stored at page {}", page_id),
//!         EnrollOutcome::StoreFailed(fail) => println!("fused but not saved: {}", fail),
//!         EnrollOutcome::Aborted(fail) => println!("enrolment aborted: {}", fail),
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod constants;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod testutil;

pub use error::{Result, ZfmError};
pub use protocol::Zfm;
pub use transport::{SerialTransport, Transport};
pub use types::*;
pub use workflow::Workflows;
