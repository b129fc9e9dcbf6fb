use serde::Serialize;

use crate::error::{Error, Result};

/// Size of a pointer in the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub const fn size(self) -> usize {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }
}

/// Page protection values reported by the OS for a region
pub mod protect {
    pub const NOACCESS: u32 = 0x01;
    pub const READONLY: u32 = 0x02;
    pub const READWRITE: u32 = 0x04;
    pub const WRITECOPY: u32 = 0x08;
    pub const EXECUTE: u32 = 0x10;
    pub const EXECUTE_READ: u32 = 0x20;
    pub const EXECUTE_READWRITE: u32 = 0x40;
    pub const GUARD: u32 = 0x100;

    /// Protections whose regions are copied and scanned.
    /// Compared for equality, so modifier bits such as GUARD exclude a region.
    pub const SCANNABLE: [u32; 4] = [READONLY, READWRITE, EXECUTE_READ, EXECUTE_READWRITE];
}

/// One virtual-memory region of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub base: u64,
    pub size: u64,
    pub committed: bool,
    pub protection: u32,
}

impl MemoryRegion {
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.size)
    }

    pub fn is_scannable(&self) -> bool {
        self.committed && protect::SCANNABLE.contains(&self.protection)
    }
}

/// Trait for reading raw memory from the target process.
///
/// Implementors provide `read_bytes`; the typed helpers decode
/// little-endian values from it.
pub trait ReadMemory {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Load base of the main module
    fn base_address(&self) -> u64;

    fn pointer_width(&self) -> PointerWidth;

    fn read_u8(&self, address: u64) -> Result<u8> {
        Ok(read_array::<Self, 1>(self, address)?[0])
    }

    fn read_i16(&self, address: u64) -> Result<i16> {
        read_array(self, address).map(i16::from_le_bytes)
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        read_array(self, address).map(i32::from_le_bytes)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        read_array(self, address).map(u32::from_le_bytes)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        read_array(self, address).map(u64::from_le_bytes)
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        read_array(self, address).map(f32::from_le_bytes)
    }

    fn read_f64(&self, address: u64) -> Result<f64> {
        read_array(self, address).map(f64::from_le_bytes)
    }

    /// Read a pointer-sized value, zero-extended to 64 bits
    fn read_pointer(&self, address: u64) -> Result<u64> {
        match self.pointer_width() {
            PointerWidth::Bits32 => self.read_u32(address).map(u64::from),
            PointerWidth::Bits64 => self.read_u64(address),
        }
    }
}

fn read_array<R: ReadMemory + ?Sized, const N: usize>(
    reader: &R,
    address: u64,
) -> Result<[u8; N]> {
    let bytes = reader.read_bytes(address, N)?;
    bytes.as_slice().try_into().map_err(|_| {
        Error::read_failed(
            address,
            format!("short read: expected {} bytes, got {}", N, bytes.len()),
        )
    })
}

/// Trait for enumerating the target's virtual address space
pub trait QueryRegions {
    /// Describe the region containing `address`, or `None` past the end of
    /// the address space.
    fn query_region(&self, address: u64) -> Option<MemoryRegion>;
}

impl<T: ReadMemory + ?Sized> ReadMemory for &T {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }

    fn base_address(&self) -> u64 {
        (**self).base_address()
    }

    fn pointer_width(&self) -> PointerWidth {
        (**self).pointer_width()
    }
}

impl<T: QueryRegions + ?Sized> QueryRegions for &T {
    fn query_region(&self, address: u64) -> Option<MemoryRegion> {
        (**self).query_region(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_scannable_requires_commit_and_exact_protection() {
        let region = MemoryRegion {
            base: 0x1000,
            size: 0x1000,
            committed: true,
            protection: protect::READWRITE,
        };
        assert!(region.is_scannable());
        assert_eq!(region.end(), 0x2000);

        let guarded = MemoryRegion {
            protection: protect::READWRITE | protect::GUARD,
            ..region
        };
        assert!(!guarded.is_scannable());

        let reserved = MemoryRegion {
            committed: false,
            ..region
        };
        assert!(!reserved.is_scannable());

        let write_copy = MemoryRegion {
            protection: protect::WRITECOPY,
            ..region
        };
        assert!(!write_copy.is_scannable());
    }

    #[test]
    fn test_pointer_width_size() {
        assert_eq!(PointerWidth::Bits32.size(), 4);
        assert_eq!(PointerWidth::Bits64.size(), 8);
    }
}
