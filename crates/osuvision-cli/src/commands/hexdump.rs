//! Hexdump command implementation.
//!
//! Displays raw memory bytes of the target. Needs no signatures, so it
//! works even when the descriptor is stale.

use anyhow::Result;
use osuvision::{Config, ProcessHandle, ReadMemory, format_hexdump};
use tracing::warn;

use super::hex_utils::parse_hex_address;

/// Largest dump a single invocation will read
pub const MAX_DUMP_SIZE: usize = 1024 * 1024;

/// Run the hexdump command
pub fn run(config: &Config, address: &str, size: usize, ascii: bool) -> Result<()> {
    let address = parse_hex_address(address)?;
    let size = clamp_size(size);
    let process = ProcessHandle::find_and_open(&config.process_name, config.module_name())?;
    let bytes = process.read_bytes(address, size)?;

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();
    for line in format_hexdump(&bytes, address, ascii) {
        println!("{}", line);
    }

    Ok(())
}

fn clamp_size(size: usize) -> usize {
    if size > MAX_DUMP_SIZE {
        warn!(
            "Requested {} bytes, dumping the first {} only",
            size, MAX_DUMP_SIZE
        );
    }
    size.min(MAX_DUMP_SIZE)
}
