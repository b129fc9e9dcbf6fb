//! Diagnostics for inspecting raw target memory.

use serde::Serialize;

use crate::memory::{QueryRegions, ReadMemory};
use crate::offset::MAX_USER_ADDRESS;

/// Format bytes as hexdump lines of 16 bytes, addressed from `base`.
///
/// ```text
/// 0x00400000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
/// ```
pub fn format_hexdump(bytes: &[u8], base: u64, ascii: bool) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:08X}: ", base + (i * 16) as u64);

            for j in 0..16 {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            if ascii {
                line.push_str(" |");
                line.extend(chunk.iter().map(|&b| {
                    if (0x20..0x7F).contains(&b) {
                        b as char
                    } else {
                        '.'
                    }
                }));
                line.extend(std::iter::repeat_n(' ', 16 - chunk.len()));
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}

/// Region counts over the whole walkable address space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub regions: usize,
    pub committed: usize,
    pub scannable: usize,
    pub scannable_bytes: u64,
}

/// Walk every region the scanner would visit, without copying any
pub fn summarize_regions<R: ReadMemory + QueryRegions + ?Sized>(reader: &R) -> RegionSummary {
    let mut summary = RegionSummary::default();
    let mut address = 0u64;

    while address < MAX_USER_ADDRESS {
        let Some(region) = reader.query_region(address) else {
            break;
        };
        let next = region.end();
        if region.size == 0 || next <= address {
            break;
        }

        summary.regions += 1;
        if region.committed {
            summary.committed += 1;
        }
        if region.is_scannable() {
            summary.scannable += 1;
            summary.scannable_bytes += region.size;
        }
        address = next;
    }

    summary
}
