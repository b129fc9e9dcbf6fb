//! In-memory stand-in for a target process.
//!
//! Models an address space as a list of regions with commit state and
//! protection, so the scanner, resolver and mirrors can be exercised without
//! a live process. Memory stays writable through `&self` so tests can
//! reshape the object graph between reads.

use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::memory::layout::dotnet;
use crate::memory::{MemoryRegion, PointerWidth, QueryRegions, ReadMemory, protect};

#[derive(Debug, Clone)]
struct MockRegion {
    base: u64,
    data: Vec<u8>,
    committed: bool,
    protection: u32,
    /// Region is listed by queries but every copy fails (paged out, revoked)
    faulty: bool,
}

impl MockRegion {
    fn end(&self) -> u64 {
        self.base + self.data.len() as u64
    }

    fn contains(&self, address: u64, size: usize) -> bool {
        address >= self.base && address.saturating_add(size as u64) <= self.end()
    }

    fn is_readable(&self) -> bool {
        self.committed
            && !self.faulty
            && self.protection & (protect::NOACCESS | protect::GUARD) == 0
            && self.protection != protect::EXECUTE
    }
}

fn write_into(regions: &mut [MockRegion], address: u64, bytes: &[u8]) {
    let region = regions
        .iter_mut()
        .find(|r| r.contains(address, bytes.len()))
        .unwrap_or_else(|| panic!("mock write outside any region: 0x{:X}", address));
    let start = (address - region.base) as usize;
    region.data[start..start + bytes.len()].copy_from_slice(bytes);
}

fn encode_dotnet_string(value: &str) -> Vec<u8> {
    let units: Vec<u16> = value.encode_utf16().collect();
    let mut bytes = vec![0u8; dotnet::STRING_CHARS as usize];
    bytes[dotnet::STRING_LENGTH as usize..dotnet::STRING_CHARS as usize]
        .copy_from_slice(&(units.len() as i32).to_le_bytes());
    bytes.extend(units.iter().flat_map(|u| u.to_le_bytes()));
    bytes
}

/// Builder for [`MockMemoryReader`]
#[derive(Debug, Clone)]
pub struct MockMemoryBuilder {
    regions: Vec<MockRegion>,
    base_address: u64,
    pointer_width: PointerWidth,
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            base_address: 0x40_0000,
            pointer_width: PointerWidth::Bits32,
        }
    }

    pub fn base_address(mut self, base: u64) -> Self {
        self.base_address = base;
        self
    }

    pub fn pointer_width(mut self, width: PointerWidth) -> Self {
        self.pointer_width = width;
        self
    }

    /// Add a committed read-write region
    pub fn region(self, base: u64, data: Vec<u8>) -> Self {
        self.region_with(base, data, true, protect::READWRITE)
    }

    pub fn region_with(
        mut self,
        base: u64,
        data: Vec<u8>,
        committed: bool,
        protection: u32,
    ) -> Self {
        self.regions.push(MockRegion {
            base,
            data,
            committed,
            protection,
            faulty: false,
        });
        self
    }

    /// Add a region that queries report as readable but cannot be copied
    pub fn faulty_region(mut self, base: u64, data: Vec<u8>) -> Self {
        self.regions.push(MockRegion {
            base,
            data,
            committed: true,
            protection: protect::READWRITE,
            faulty: true,
        });
        self
    }

    pub fn write_bytes(mut self, address: u64, bytes: &[u8]) -> Self {
        write_into(&mut self.regions, address, bytes);
        self
    }

    pub fn write_u8(self, address: u64, value: u8) -> Self {
        self.write_bytes(address, &[value])
    }

    pub fn write_i16(self, address: u64, value: i16) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_i32(self, address: u64, value: i32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u32(self, address: u64, value: u32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f32(self, address: u64, value: f32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f64(self, address: u64, value: f64) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    /// Write a pointer using the configured pointer width
    pub fn write_pointer(self, address: u64, value: u64) -> Self {
        match self.pointer_width {
            PointerWidth::Bits32 => self.write_u32(address, value as u32),
            PointerWidth::Bits64 => self.write_bytes(address, &value.to_le_bytes()),
        }
    }

    /// Lay out a .NET string object at `object`
    pub fn write_dotnet_string(self, object: u64, value: &str) -> Self {
        self.write_bytes(object, &encode_dotnet_string(value))
    }

    pub fn build(mut self) -> MockMemoryReader {
        self.regions.sort_by_key(|r| r.base);
        MockMemoryReader {
            regions: RwLock::new(self.regions),
            base_address: self.base_address,
            pointer_width: self.pointer_width,
        }
    }
}

/// Mock process memory implementing [`ReadMemory`] and [`QueryRegions`]
#[derive(Debug)]
pub struct MockMemoryReader {
    regions: RwLock<Vec<MockRegion>>,
    base_address: u64,
    pointer_width: PointerWidth,
}

impl MockMemoryReader {
    pub fn write_bytes(&self, address: u64, bytes: &[u8]) {
        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());
        write_into(&mut regions, address, bytes);
    }

    pub fn write_i16(&self, address: u64, value: i16) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_i32(&self, address: u64, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_f64(&self, address: u64, value: f64) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_pointer(&self, address: u64, value: u64) {
        match self.pointer_width {
            PointerWidth::Bits32 => self.write_bytes(address, &(value as u32).to_le_bytes()),
            PointerWidth::Bits64 => self.write_bytes(address, &value.to_le_bytes()),
        }
    }

    pub fn write_dotnet_string(&self, object: u64, value: &str) {
        self.write_bytes(object, &encode_dotnet_string(value));
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let regions = self.regions.read().unwrap_or_else(|e| e.into_inner());
        let region = regions
            .iter()
            .find(|r| r.contains(address, size))
            .ok_or_else(|| Error::read_failed(address, "address not mapped"))?;

        if !region.is_readable() {
            return Err(Error::read_failed(address, "access denied"));
        }

        let start = (address - region.base) as usize;
        Ok(region.data[start..start + size].to_vec())
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn pointer_width(&self) -> PointerWidth {
        self.pointer_width
    }
}

impl QueryRegions for MockMemoryReader {
    fn query_region(&self, address: u64) -> Option<MemoryRegion> {
        let regions = self.regions.read().unwrap_or_else(|e| e.into_inner());

        if let Some(region) = regions
            .iter()
            .find(|r| address >= r.base && address < r.end())
        {
            return Some(MemoryRegion {
                base: region.base,
                size: region.data.len() as u64,
                committed: region.committed,
                protection: region.protection,
            });
        }

        // Gaps between regions are reported as free space
        let next = regions.iter().find(|r| r.base > address)?;
        Some(MemoryRegion {
            base: address,
            size: next.base - address,
            committed: false,
            protection: protect::NOACCESS,
        })
    }
}
