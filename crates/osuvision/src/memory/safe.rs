//! Fail-closed typed reads.
//!
//! Every read returns a [`Readout`]: either the decoded value or
//! `Unavailable`. Faults never escape as errors; polling callers collapse
//! a readout to the type's zero value with [`Readout::or_default`].

use encoding_rs::UTF_16LE;
use serde::Serialize;
use tracing::trace;

use crate::config::DEFAULT_STRING_CAP;
use crate::memory::ReadMemory;
use crate::memory::layout::dotnet;

/// Lowest address a .NET object reference is trusted at
pub const MIN_OBJECT_ADDRESS: u64 = 0x10000;

/// `base + offset`, or `Unavailable` when a corrupt base would overflow
pub fn field_address(base: u64, offset: u64) -> Readout<u64> {
    base.checked_add(offset).into()
}

/// A value read from the target, or the fact that it could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[must_use]
pub enum Readout<T> {
    Value(T),
    Unavailable,
}

impl<T> Readout<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Readout::Value(_))
    }

    pub fn value(self) -> Option<T> {
        match self {
            Readout::Value(v) => Some(v),
            Readout::Unavailable => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Readout<U> {
        match self {
            Readout::Value(v) => Readout::Value(f(v)),
            Readout::Unavailable => Readout::Unavailable,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Readout<U>) -> Readout<U> {
        match self {
            Readout::Value(v) => f(v),
            Readout::Unavailable => Readout::Unavailable,
        }
    }

    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Readout<T> {
        match self {
            Readout::Value(v) if predicate(&v) => Readout::Value(v),
            _ => Readout::Unavailable,
        }
    }
}

impl<T: Default> Readout<T> {
    /// Collapse to the fail-closed default (0, 0.0, false, "" or empty)
    pub fn or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Readout<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Readout::Value(v),
            None => Readout::Unavailable,
        }
    }
}

impl<T, E> From<std::result::Result<T, E>> for Readout<T> {
    fn from(value: std::result::Result<T, E>) -> Self {
        value.ok().into()
    }
}

/// Typed, bounded reads over any [`ReadMemory`] that never fail loudly
pub struct SafeReader<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    string_cap: usize,
}

impl<'a, R: ReadMemory + ?Sized> SafeReader<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            string_cap: DEFAULT_STRING_CAP,
        }
    }

    pub fn with_string_cap(mut self, cap: usize) -> Self {
        self.string_cap = cap;
        self
    }

    pub fn string_cap(&self) -> usize {
        self.string_cap
    }

    pub fn read_i32(&self, address: u64) -> Readout<i32> {
        self.guarded(address, |r| r.read_i32(address).into())
    }

    pub fn read_i16(&self, address: u64) -> Readout<i16> {
        self.guarded(address, |r| r.read_i16(address).into())
    }

    pub fn read_f64(&self, address: u64) -> Readout<f64> {
        self.guarded(address, |r| r.read_f64(address).into())
    }

    pub fn read_f32(&self, address: u64) -> Readout<f32> {
        self.guarded(address, |r| r.read_f32(address).into())
    }

    pub fn read_bool(&self, address: u64) -> Readout<bool> {
        self.guarded(address, |r| Readout::from(r.read_u8(address)).map(|b| b != 0))
    }

    pub fn read_pointer(&self, address: u64) -> Readout<u64> {
        self.guarded(address, |r| r.read_pointer(address).into())
    }

    /// Read a .NET `System.String` given the object's address.
    ///
    /// The element count sits at `+0x4` and UTF-16LE code units follow at
    /// `+0x8`. A count outside `1..=string_cap` is treated as corrupt.
    pub fn read_dotnet_string(&self, object: u64) -> Readout<String> {
        if object < MIN_OBJECT_ADDRESS {
            return Readout::Unavailable;
        }

        let Readout::Value(length) = field_address(object, dotnet::STRING_LENGTH)
            .and_then(|address| Readout::from(self.reader.read_i32(address)))
        else {
            return Readout::Unavailable;
        };

        if length <= 0 || length as usize > self.string_cap {
            trace!(
                "Rejecting string at 0x{:X}: length {} outside 1..={}",
                object, length, self.string_cap
            );
            return Readout::Unavailable;
        }

        let Readout::Value(raw) = field_address(object, dotnet::STRING_CHARS)
            .and_then(|address| Readout::from(self.reader.read_bytes(address, length as usize * 2)))
        else {
            return Readout::Unavailable;
        };

        let (decoded, _) = UTF_16LE.decode_without_bom_handling(&raw);
        Readout::Value(decoded.into_owned())
    }

    /// Dereference the object reference stored at `field` and read it as a
    /// .NET string
    pub fn read_string_field(&self, field: u64) -> Readout<String> {
        self.read_pointer(field)
            .and_then(|object| self.read_dotnet_string(object))
    }

    /// Read `count` consecutive little-endian i32 values
    pub fn read_i32_array(&self, address: u64, count: usize) -> Readout<Vec<i32>> {
        if count == 0 {
            return Readout::Value(Vec::new());
        }
        let Some(size) = count.checked_mul(4) else {
            return Readout::Unavailable;
        };
        self.guarded(address, |r| {
            Readout::from(r.read_bytes(address, size)).map(|bytes| {
                bytes
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect()
            })
        })
    }

    fn guarded<T>(&self, address: u64, read: impl FnOnce(&R) -> Readout<T>) -> Readout<T> {
        if address == 0 {
            return Readout::Unavailable;
        }
        read(self.reader)
    }
}
