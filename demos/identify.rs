//! Identification Example
//!
//! Captures a live finger and identifies it two ways:
//! - Searching the whole template library (identify-by-search)
//! - Comparing against one specific page (identify-by-id)
//!
//! Usage:
//!   cargo run --example identify                  # Interactive port selection
//!   cargo run --example identify -- /dev/ttyUSB0
//!   cargo run --example identify -- /dev/ttyUSB0 7   # Also compare against page 7
//!
//! Set RUST_LOG to see protocol traffic:
//!   RUST_LOG=debug cargo run --example identify

use inquire::Select;
use log::info;
use zfm_protocol::{MatchOutcome, Result, SearchOutcome, Workflows, Zfm};

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

    info!("Connecting to module on {}...", port_name);
    let mut zfm = Zfm::open(&port_name)?;

    info!("=== Identify by search ===");
    info!("Place a finger on the sensor");
    match Workflows::new(&mut zfm).search_identify(0, 1000)? {
        SearchOutcome::Match(hit) => {
            info!("✓ Match at page {} (score {})", hit.page_id, hit.score);
        }
        SearchOutcome::NoMatch(code) => {
            info!("✗ No match in library: {}", code);
        }
        SearchOutcome::Aborted(fail) => {
            info!("✗ Identification aborted: {}", fail);
        }
    }

    // Optional second pass: compare against one specific page
    if let Some(page_id) = std::env::args().nth(2).and_then(|s| s.parse::<u16>().ok()) {
        info!("=== Identify against page {} ===", page_id);
        info!("Place the finger again");
        match Workflows::new(&mut zfm).identify_by_id(page_id)? {
            MatchOutcome::Match { score } => {
                info!("✓ Finger matches page {} (score {})", page_id, score);
            }
            MatchOutcome::NoMatch(code) => {
                info!("✗ No match: {}", code);
            }
            MatchOutcome::Aborted(fail) => {
                info!("✗ Comparison aborted: {}", fail);
            }
        }
    }

    Ok(())
}
