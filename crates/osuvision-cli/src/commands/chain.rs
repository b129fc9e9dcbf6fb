//! Chain command: walk a pointer chain and show every hop.

use anyhow::{Result, bail};
use osuvision::{Config, Readout, Session, trace_chain};
use owo_colors::OwoColorize;

use super::hex_utils::{parse_hex_address, parse_hex_offset};

pub fn run(config: &Config, base: &str, offsets: &[String]) -> Result<()> {
    let offsets = offsets
        .iter()
        .map(|s| parse_hex_offset(s))
        .collect::<Result<Vec<_>>>()?;

    let session = Session::attach_global(config)?;

    let start = if session.table().contains(base) {
        match session.resolve(base) {
            Some(address) => address,
            None => bail!("Signature '{}' is unresolved", base),
        }
    } else {
        parse_hex_address(base)?
    };

    println!("Base {} = 0x{:X}", base, start);
    let (steps, result) = trace_chain(session.reader(), start, &offsets);

    for step in &steps {
        let value = match step.value {
            Some(v) => format!("0x{:X}", v),
            None => "read failed".red().to_string(),
        };
        let sign = if step.offset < 0 { '-' } else { '+' };
        println!(
            "  [0x{:X}] ({}0x{:X}) -> {}",
            step.address,
            sign,
            step.offset.unsigned_abs(),
            value
        );
    }

    match result {
        Readout::Value(address) => println!("Result: {}", format!("0x{:X}", address).green()),
        Readout::Unavailable => println!("Result: {}", "unresolved".red()),
    }

    Ok(())
}
