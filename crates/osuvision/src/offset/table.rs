use serde::Serialize;
use tracing::{debug, info, warn};

use crate::memory::{QueryRegions, ReadMemory};
use crate::offset::{ProcessMemoryScanner, SignatureCatalog};

/// One named address; `None` marks a signature that was not found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub address: Option<u64>,
}

/// Signature name to absolute address, built once per attach.
///
/// There is no mutating API: entries are fixed for the lifetime of the
/// table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressTable {
    entries: Vec<TableEntry>,
}

impl AddressTable {
    /// Scan for every signature in catalog order
    pub fn build<R: ReadMemory + QueryRegions + ?Sized>(
        reader: &R,
        catalog: &SignatureCatalog,
    ) -> Self {
        let scanner = ProcessMemoryScanner::new(reader);
        let entries: Vec<TableEntry> = catalog
            .iter()
            .map(|signature| {
                let address = scanner.resolve(signature);
                match address {
                    Some(addr) => debug!("  {}: 0x{:X}", signature.name, addr),
                    None => warn!("Signature '{}' not found", signature.name),
                }
                TableEntry {
                    name: signature.name.clone(),
                    address,
                }
            })
            .collect();

        let table = Self { entries };
        info!(
            "Address table built: {}/{} signatures resolved",
            table.resolved_count(),
            table.len()
        );
        table
    }

    pub fn from_entries<S: Into<String>>(entries: impl IntoIterator<Item = (S, Option<u64>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, address)| TableEntry {
                    name: name.into(),
                    address,
                })
                .collect(),
        }
    }

    /// Address for `name`, or `None` when unknown or unresolved
    pub fn resolve(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.address)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|e| e.address.is_some()).count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.address.is_none())
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    fn catalog() -> SignatureCatalog {
        SignatureCatalog::from_json(
            r#"{"signatures": [
                {"name": "Base", "pattern": "8B 0D ?? ?? ?? ??", "offset": 2},
                {"name": "Missing", "pattern": "DE AD BE EF"},
                {"name": "Rulesets", "pattern": "7D 15 A1", "offset": 3}
            ]}"#,
        )
        .unwrap()
    }

    fn memory() -> crate::memory::MockMemoryReader {
        let mut data = vec![0u8; 0x400];
        data[100..106].copy_from_slice(&[0x8B, 0x0D, 1, 2, 3, 4]);
        data[0x200..0x203].copy_from_slice(&[0x7D, 0x15, 0xA1]);
        MockMemoryBuilder::new().region(0x50_0000, data).build()
    }

    #[test]
    fn test_build_resolves_in_catalog_order() {
        let table = AddressTable::build(&memory(), &catalog());

        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Base", "Missing", "Rulesets"]);
        assert_eq!(table.resolve("Base"), Some(0x50_0000 + 102));
        assert_eq!(table.resolve("Rulesets"), Some(0x50_0203));
        assert_eq!(table.resolved_count(), 2);
    }

    #[test]
    fn test_unresolved_is_a_sentinel_not_an_error() {
        let table = AddressTable::build(&memory(), &catalog());
        assert!(table.contains("Missing"));
        assert_eq!(table.resolve("Missing"), None);
        assert_eq!(table.resolve("NeverDeclared"), None);
        assert_eq!(table.unresolved().collect::<Vec<_>>(), ["Missing"]);
    }

    #[test]
    fn test_repeated_lookups_are_identical() {
        let table = AddressTable::build(&memory(), &catalog());
        let first = table.resolve("Base");
        for _ in 0..10 {
            assert_eq!(table.resolve("Base"), first);
        }
    }

    #[test]
    fn test_from_entries() {
        let table = AddressTable::from_entries([("Base", Some(0x1234)), ("Other", None)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("Base"), Some(0x1234));
        assert_eq!(table.resolve("Other"), None);
    }
}
