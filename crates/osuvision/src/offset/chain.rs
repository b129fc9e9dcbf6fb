//! Pointer chain resolution.
//!
//! A chain starts at a named address and alternates "add offset" and
//! "dereference one pointer". Every call walks the whole chain again: the
//! target's garbage collector moves objects between frames, so no link is
//! ever cached.

use serde::Serialize;

use crate::memory::{ReadMemory, Readout};
use crate::offset::AddressTable;

/// Addresses at or below this are treated as null
pub const MIN_VALID_ADDRESS: u64 = 0x1000;

/// One dereference performed while walking a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainStep {
    pub offset: i64,
    /// `current + offset`
    pub address: u64,
    /// Pointer read at `address`, `None` when the read faulted
    pub value: Option<u64>,
}

/// Follow `offsets` from an already resolved `base`
pub fn follow_chain<R: ReadMemory + ?Sized>(reader: &R, base: u64, offsets: &[i64]) -> Readout<u64> {
    walk(reader, base, offsets, |_| {})
}

/// Follow `offsets` from the table entry `base_name`
pub fn resolve_chain<R: ReadMemory + ?Sized>(
    reader: &R,
    table: &AddressTable,
    base_name: &str,
    offsets: &[i64],
) -> Readout<u64> {
    match table.resolve(base_name) {
        Some(base) if base != 0 => follow_chain(reader, base, offsets),
        _ => Readout::Unavailable,
    }
}

/// Like [`follow_chain`], also returning every step taken
pub fn trace_chain<R: ReadMemory + ?Sized>(
    reader: &R,
    base: u64,
    offsets: &[i64],
) -> (Vec<ChainStep>, Readout<u64>) {
    let mut steps = Vec::with_capacity(offsets.len());
    let result = walk(reader, base, offsets, |step| steps.push(step));
    (steps, result)
}

fn walk<R: ReadMemory + ?Sized>(
    reader: &R,
    base: u64,
    offsets: &[i64],
    mut on_step: impl FnMut(ChainStep),
) -> Readout<u64> {
    let mut current = base;

    for &offset in offsets {
        if current < MIN_VALID_ADDRESS {
            return Readout::Unavailable;
        }
        let address = current.wrapping_add_signed(offset);
        let value = reader.read_pointer(address).ok();
        on_step(ChainStep {
            offset,
            address,
            value,
        });
        // A faulted read becomes null and fails the next check
        current = value.unwrap_or(0);
    }

    if current > MIN_VALID_ADDRESS {
        Readout::Value(current)
    } else {
        Readout::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, MockMemoryReader, PointerWidth};

    const B: u64 = 0x60_0100;
    const P1: u64 = 0x70_0000;
    const P2: u64 = 0x70_0800;

    fn memory() -> MockMemoryReader {
        MockMemoryBuilder::new()
            .region(0x60_0000, vec![0u8; 0x1000])
            .region(0x70_0000, vec![0u8; 0x1000])
            .write_pointer(B - 0xC, P1)
            .write_pointer(P1, P2)
            .build()
    }

    fn table() -> AddressTable {
        AddressTable::from_entries([("Base", Some(B)), ("Missing", None), ("Zero", Some(0))])
    }

    #[test]
    fn test_base_chain_scenario() {
        let mem = memory();
        assert_eq!(
            resolve_chain(&mem, &table(), "Base", &[-0xC, 0]),
            Readout::Value(P2)
        );
    }

    #[test]
    fn test_final_value_at_threshold_is_unresolved() {
        let mem = memory();
        mem.write_pointer(P1, MIN_VALID_ADDRESS);
        assert_eq!(
            resolve_chain(&mem, &table(), "Base", &[-0xC, 0]),
            Readout::Unavailable
        );

        mem.write_pointer(P1, MIN_VALID_ADDRESS + 1);
        assert_eq!(
            resolve_chain(&mem, &table(), "Base", &[-0xC, 0]),
            Readout::Value(MIN_VALID_ADDRESS + 1)
        );
    }

    #[test]
    fn test_low_link_fails_at_any_position() {
        for bad_index in 0..4 {
            let mem = MockMemoryBuilder::new()
                .region(0x60_0000, vec![0u8; 0x1000])
                .build();
            let links: Vec<u64> = (0..5).map(|i| 0x60_0000 + 0x100 * i).collect();
            for i in 0..4 {
                let next = if i == bad_index { 0x800 } else { links[i + 1] };
                mem.write_pointer(links[i], next);
            }

            assert_eq!(
                follow_chain(&mem, links[0], &[0, 0, 0, 0]),
                Readout::Unavailable,
                "bad link at {}",
                bad_index
            );
        }
    }

    #[test]
    fn test_unresolved_base_fails_immediately() {
        let mem = memory();
        let table = table();
        assert_eq!(resolve_chain(&mem, &table, "Missing", &[0]), Readout::Unavailable);
        assert_eq!(resolve_chain(&mem, &table, "Zero", &[0]), Readout::Unavailable);
        assert_eq!(resolve_chain(&mem, &table, "Unknown", &[0]), Readout::Unavailable);
    }

    #[test]
    fn test_read_fault_fails_the_chain() {
        let mem = memory();
        mem.write_pointer(P1, 0xDEAD_0000);
        assert_eq!(
            resolve_chain(&mem, &table(), "Base", &[-0xC, 0, 0]),
            Readout::Unavailable
        );
    }

    #[test]
    fn test_chain_is_walked_fresh_every_call() {
        let mem = memory();
        let table = table();
        assert_eq!(resolve_chain(&mem, &table, "Base", &[-0xC, 0]), Readout::Value(P2));

        mem.write_pointer(P1, P2 + 0x40);
        assert_eq!(
            resolve_chain(&mem, &table, "Base", &[-0xC, 0]),
            Readout::Value(P2 + 0x40)
        );
        assert_eq!(table.resolve("Base"), Some(B));
    }

    #[test]
    fn test_empty_chain_checks_base_only() {
        let mem = memory();
        assert_eq!(follow_chain(&mem, B, &[]), Readout::Value(B));
        assert_eq!(follow_chain(&mem, 0x10, &[]), Readout::Unavailable);
    }

    #[test]
    fn test_trace_chain_records_steps() {
        let mem = memory();
        let (steps, result) = trace_chain(&mem, B, &[-0xC, 0]);
        assert_eq!(result, Readout::Value(P2));
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].address, B - 0xC);
        assert_eq!(steps[0].value, Some(P1));
        assert_eq!(steps[1].value, Some(P2));
    }

    #[test]
    fn test_pointers_are_target_width() {
        let mem = MockMemoryBuilder::new()
            .pointer_width(PointerWidth::Bits64)
            .region(0x1_0000_0000, vec![0u8; 0x100])
            .write_pointer(0x1_0000_0000, 0x1_0000_0080)
            .build();
        assert_eq!(
            follow_chain(&mem, 0x1_0000_0000, &[0]),
            Readout::Value(0x1_0000_0080)
        );
    }
}
