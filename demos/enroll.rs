//! Enrolment Example
//!
//! Walks through a full enrolment against a connected ZFM module:
//! - Listing and selecting serial ports
//! - Running the six-step enrol workflow into a chosen page
//! - Reporting the exact step and reason when the module refuses
//!
//! Usage:
//!   cargo run --example enroll                  # Interactive port selection
//!   cargo run --example enroll -- /dev/ttyUSB0
//!   cargo run --example enroll -- /dev/ttyUSB0 7   # Port and page id
//!
//! Set RUST_LOG to see protocol traffic:
//!   RUST_LOG=debug cargo run --example enroll

use inquire::Select;
use log::info;
use zfm_protocol::{EnrollOutcome, Result, Workflows, Zfm};

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = Zfm::list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

    let port_name = selection.split(" - ").next().unwrap().to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port_name = std::env::args()
        .nth(1)
        .map(Ok)
        .unwrap_or_else(select_port)?;

    let page_id: u16 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    info!("Connecting to module on {}...", port_name);
    let mut zfm = Zfm::open(&port_name)?;

    info!("Place a finger on the sensor");
    match Workflows::new(&mut zfm).enroll(page_id)? {
        EnrollOutcome::Stored { page_id } => {
            info!("✓ Enrolment complete, template stored at page {}", page_id);
        }
        EnrollOutcome::StoreFailed(fail) => {
            info!("✗ Model fused but not saved: {}", fail);
        }
        EnrollOutcome::Aborted(fail) => {
            info!("✗ Enrolment aborted: {}", fail);
        }
    }

    Ok(())
}
