//! Whole-address-space signature scanner.
//!
//! Walks the target's regions from address 0 upward, copies every committed
//! region with a plainly readable protection and returns the first address
//! where a wildcard pattern matches. Regions that fail to copy are skipped.

use tracing::{debug, trace};

use crate::memory::{QueryRegions, ReadMemory};
use crate::offset::Signature;

/// Highest user-mode address walked by the scanner
pub const MAX_USER_ADDRESS: u64 = if cfg!(target_pointer_width = "64") {
    0x7FFF_FFFF_FFFF
} else {
    0x7FFF_FFFF
};

/// Counters collected during one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub regions_visited: usize,
    pub regions_scanned: usize,
    /// Scannable regions whose copy failed
    pub regions_skipped: usize,
    pub bytes_scanned: u64,
}

pub struct ProcessMemoryScanner<'a, R: ReadMemory + QueryRegions + ?Sized> {
    reader: &'a R,
    max_address: u64,
}

impl<'a, R: ReadMemory + QueryRegions + ?Sized> ProcessMemoryScanner<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            max_address: MAX_USER_ADDRESS,
        }
    }

    pub fn with_max_address(mut self, max_address: u64) -> Self {
        self.max_address = max_address;
        self
    }

    /// Absolute address of the first match across all scannable regions
    pub fn find_first(&self, pattern: &[Option<u8>]) -> Option<u64> {
        self.find_first_with_stats(pattern).0
    }

    pub fn find_first_with_stats(&self, pattern: &[Option<u8>]) -> (Option<u64>, ScanStats) {
        let mut stats = ScanStats::default();
        let mut address = 0u64;

        while address < self.max_address {
            let Some(region) = self.reader.query_region(address) else {
                break;
            };

            let next = region.end();
            if region.size == 0 || next <= address {
                break;
            }
            stats.regions_visited += 1;

            if region.is_scannable() {
                match self.reader.read_bytes(region.base, region.size as usize) {
                    Ok(buffer) => {
                        stats.regions_scanned += 1;
                        stats.bytes_scanned += buffer.len() as u64;
                        if let Some(index) = find_pattern(&buffer, pattern) {
                            return (Some(region.base + index as u64), stats);
                        }
                    }
                    Err(e) => {
                        stats.regions_skipped += 1;
                        trace!("Skipping region 0x{:X}: {}", region.base, e);
                    }
                }
            }

            address = next;
        }

        (None, stats)
    }

    /// Scan for a signature and apply its module-relative flag and offset
    pub fn resolve(&self, signature: &Signature) -> Option<u64> {
        let (found, stats) = self.find_first_with_stats(&signature.pattern);
        debug!(
            "Scanned '{}': {} regions visited, {} scanned, {} skipped, {} bytes",
            signature.name,
            stats.regions_visited,
            stats.regions_scanned,
            stats.regions_skipped,
            stats.bytes_scanned
        );
        let found = found?;

        let address = if signature.rva {
            // Re-expressed against the load base; identical unless the module moved
            let module_base = self.reader.base_address();
            module_base.wrapping_add(found.wrapping_sub(module_base))
        } else {
            found
        };

        Some(address.wrapping_add_signed(signature.offset))
    }
}

/// First index in `buffer` where every non-wildcard byte of `pattern` matches
pub fn find_pattern(buffer: &[u8], pattern: &[Option<u8>]) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() {
        return None;
    }
    let last = buffer.len() - pattern.len();

    // Anchor on the first concrete byte so memchr does the heavy lifting
    let Some((anchor, anchor_byte)) = pattern
        .iter()
        .enumerate()
        .find_map(|(i, b)| b.map(|value| (i, value)))
    else {
        return Some(0);
    };

    memchr::memchr_iter(anchor_byte, &buffer[anchor..=last + anchor])
        .find(|&start| matches_at(buffer, start, pattern))
}

fn matches_at(buffer: &[u8], start: usize, pattern: &[Option<u8>]) -> bool {
    pattern
        .iter()
        .zip(&buffer[start..start + pattern.len()])
        .all(|(expected, actual)| expected.is_none_or(|value| value == *actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, protect};
    use crate::offset::parse_pattern;

    fn signature(name: &str, pattern: &str, offset: i64, rva: bool) -> Signature {
        Signature {
            name: name.to_string(),
            pattern: parse_pattern(pattern).unwrap(),
            offset,
            rva,
        }
    }

    #[test]
    fn test_find_pattern_honors_wildcards() {
        let buffer = [0x00, 0x8B, 0x0D, 0x11, 0x22, 0x8B, 0x0E, 0x8B, 0x0D, 0xAA];
        let pattern = parse_pattern("8B 0E AA").unwrap();
        assert_eq!(find_pattern(&buffer, &pattern), None);

        let pattern = parse_pattern("8B 0D ?? 22").unwrap();
        assert_eq!(find_pattern(&buffer, &pattern), Some(1));

        let pattern = parse_pattern("?? 0D AA").unwrap();
        assert_eq!(find_pattern(&buffer, &pattern), Some(7));
    }

    #[test]
    fn test_find_pattern_edges() {
        let pattern = parse_pattern("?? ??").unwrap();
        assert_eq!(find_pattern(&[1, 2, 3], &pattern), Some(0));
        assert_eq!(find_pattern(&[1], &pattern), None);
        assert_eq!(find_pattern(&[1, 2], &[]), None);

        let tail = parse_pattern("02 03").unwrap();
        assert_eq!(find_pattern(&[1, 2, 3], &tail), Some(1));
    }

    #[test]
    fn test_base_signature_scenario() {
        let mut data = vec![0u8; 0x200];
        data[100..106].copy_from_slice(&[0x8B, 0x0D, 0x10, 0x20, 0x30, 0x40]);
        let mem = MockMemoryBuilder::new()
            .region(0x10_0000, vec![0u8; 0x100])
            .region(0x20_0000, data)
            .build();

        let scanner = ProcessMemoryScanner::new(&mem);
        let sig = signature("Base", "8B 0D ?? ?? ?? ??", 2, false);
        assert_eq!(scanner.resolve(&sig), Some(0x20_0000 + 100 + 2));
    }

    #[test]
    fn test_first_match_wins_across_regions() {
        let mut first = vec![0u8; 0x40];
        first[0x30] = 0xCC;
        first[0x31] = 0xDD;
        let mut second = vec![0u8; 0x40];
        second[0x4] = 0xCC;
        second[0x5] = 0xDD;

        let mem = MockMemoryBuilder::new()
            .region(0x30_0000, second)
            .region(0x10_0000, first)
            .build();

        let scanner = ProcessMemoryScanner::new(&mem);
        assert_eq!(scanner.find_first(&[Some(0xCC), Some(0xDD)]), Some(0x10_0030));
    }

    #[test]
    fn test_unreadable_regions_are_skipped() {
        let hit = vec![0xCC, 0xDD, 0, 0];
        let mem = MockMemoryBuilder::new()
            .region_with(0x1000, hit.clone(), false, protect::READWRITE)
            .region_with(0x2000, hit.clone(), true, protect::READWRITE | protect::GUARD)
            .region_with(0x3000, hit.clone(), true, protect::NOACCESS)
            .region_with(0x4000, hit.clone(), true, protect::WRITECOPY)
            .faulty_region(0x5000, hit.clone())
            .region_with(0x6000, hit, true, protect::EXECUTE_READ)
            .build();

        let scanner = ProcessMemoryScanner::new(&mem);
        let (found, stats) = scanner.find_first_with_stats(&[Some(0xCC), Some(0xDD)]);
        assert_eq!(found, Some(0x6000));
        assert_eq!(stats.regions_skipped, 1);
        assert_eq!(stats.regions_scanned, 1);
    }

    #[test]
    fn test_not_found() {
        let mem = MockMemoryBuilder::new()
            .region(0x1000, vec![0x11; 0x100])
            .build();
        let scanner = ProcessMemoryScanner::new(&mem);
        assert_eq!(scanner.find_first(&[Some(0x22)]), None);
        assert_eq!(scanner.resolve(&signature("Missing", "22 33", 4, false)), None);
    }

    #[test]
    fn test_max_address_bounds_the_walk() {
        let mem = MockMemoryBuilder::new()
            .region(0x1000, vec![0; 0x100])
            .region(0x8000, vec![0xEE; 0x100])
            .build();
        let scanner = ProcessMemoryScanner::new(&mem).with_max_address(0x4000);
        assert_eq!(scanner.find_first(&[Some(0xEE)]), None);
    }

    #[test]
    fn test_rva_and_negative_offset() {
        let mut data = vec![0u8; 0x100];
        data[0x40] = 0xA1;
        let mem = MockMemoryBuilder::new()
            .base_address(0x40_0000)
            .region(0x40_0000, data)
            .build();
        let scanner = ProcessMemoryScanner::new(&mem);

        assert_eq!(
            scanner.resolve(&signature("Rva", "A1", 0, true)),
            Some(0x40_0040)
        );
        assert_eq!(
            scanner.resolve(&signature("Back", "A1", -0xC, false)),
            Some(0x40_0034)
        );
    }
}
