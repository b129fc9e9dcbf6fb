//! Scan command: attach, build the address table and print it.

use anyhow::Result;
use osuvision::{Config, Session, summarize_regions};
use owo_colors::OwoColorize;

pub fn run(config: &Config, json: bool, regions: bool) -> Result<()> {
    let session = Session::attach_global(config)?;
    let table = session.table();

    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        let width = table
            .entries()
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0);

        for entry in table.entries() {
            match entry.address {
                Some(address) => println!("{:<width$}  0x{:08X}", entry.name, address),
                None => println!("{:<width$}  {}", entry.name, "not found".red()),
            }
        }
        println!();
        println!(
            "{}/{} signatures resolved",
            table.resolved_count(),
            table.len()
        );
    }

    if regions {
        let summary = summarize_regions(session.reader());
        println!(
            "Regions: {} total, {} committed, {} scannable ({} bytes)",
            summary.regions, summary.committed, summary.scannable, summary.scannable_bytes
        );
    }

    Ok(())
}
