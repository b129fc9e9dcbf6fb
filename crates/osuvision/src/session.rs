//! Attached session: the process reader plus the address table built for it.

use std::sync::{Mutex, OnceLock};

use tracing::info;

use crate::config::{Config, DEFAULT_STRING_CAP};
use crate::error::Result;
use crate::memory::layout::STATIC_REF;
use crate::memory::{ProcessHandle, QueryRegions, ReadMemory, Readout, SafeReader};
use crate::mirror::{AudioEngine, Beatmap, GameBase, GamePlay, GameSnapshot, Player};
use crate::offset::{self, AddressTable, SignatureCatalog, load_signatures};

static GLOBAL: OnceLock<Session<ProcessHandle>> = OnceLock::new();
static ATTACH: Mutex<()> = Mutex::new(());

/// Owns the reader and the address table. The table is built once and
/// never rescanned; only values reached through it change between calls.
#[derive(Debug)]
pub struct Session<R: ReadMemory> {
    reader: R,
    table: AddressTable,
    string_cap: usize,
}

impl<R: ReadMemory> Session<R> {
    pub fn new(reader: R, table: AddressTable) -> Self {
        Self {
            reader,
            table,
            string_cap: DEFAULT_STRING_CAP,
        }
    }

    /// Build the address table by scanning `reader` for every signature
    pub fn scan(reader: R, catalog: &SignatureCatalog) -> Self
    where
        R: QueryRegions,
    {
        let table = AddressTable::build(&reader, catalog);
        Self::new(reader, table)
    }

    pub fn with_string_cap(mut self, string_cap: usize) -> Self {
        self.string_cap = string_cap;
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn table(&self) -> &AddressTable {
        &self.table
    }

    /// Fail-closed typed reads against the target
    pub fn read(&self) -> SafeReader<'_, R> {
        SafeReader::new(&self.reader).with_string_cap(self.string_cap)
    }

    pub fn resolve(&self, name: &str) -> Option<u64> {
        self.table.resolve(name)
    }

    pub fn resolve_chain(&self, base_name: &str, offsets: &[i64]) -> Readout<u64> {
        offset::resolve_chain(&self.reader, &self.table, base_name, offsets)
    }

    /// Follow a chain from an address that is already known
    pub fn follow_chain(&self, base: u64, offsets: &[i64]) -> Readout<u64> {
        offset::follow_chain(&self.reader, base, offsets)
    }

    /// Value behind a static reference signature: `[[name]]`
    pub(crate) fn static_i32(&self, name: &str) -> Readout<i32> {
        self.resolve_chain(name, STATIC_REF)
            .and_then(|ptr| self.read().read_i32(ptr))
    }

    pub(crate) fn static_bool(&self, name: &str) -> Readout<bool> {
        self.resolve_chain(name, STATIC_REF)
            .and_then(|ptr| self.read().read_bool(ptr))
    }

    pub fn game_base(&self) -> GameBase<'_, R> {
        GameBase::new(self)
    }

    pub fn audio_engine(&self) -> AudioEngine<'_, R> {
        AudioEngine::new(self)
    }

    pub fn player(&self) -> Player<'_, R> {
        Player::new(self)
    }

    pub fn beatmap(&self) -> Beatmap<'_, R> {
        Beatmap::new(self)
    }

    pub fn gameplay(&self) -> GamePlay<'_, R> {
        GamePlay::new(self)
    }

    /// Read every mirror once
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

impl Session<ProcessHandle> {
    /// Load signatures, open the target and build the address table.
    ///
    /// Any failure here is fatal for the caller: there is nothing to poll
    /// without a process and a table.
    pub fn attach(config: &Config) -> Result<Self> {
        let catalog = load_signatures(&config.signatures)?;
        info!(
            "Loaded {} signatures from {}",
            catalog.len(),
            config.signatures.display()
        );

        let process = ProcessHandle::find_and_open(&config.process_name, config.module_name())?;
        info!(
            "Attached to {} (pid {}, base 0x{:X}, {:?})",
            config.process_name, process.pid, process.base_address, process.pointer_width
        );

        Ok(Self::scan(process, &catalog).with_string_cap(config.string_cap))
    }

    /// Attach once per process. Later calls return the existing session and
    /// ignore `config`.
    pub fn attach_global(config: &Config) -> Result<&'static Self> {
        attach_once(&GLOBAL, || Self::attach(config))
    }

    /// The global session, if `attach_global` has succeeded
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }
}

/// Fill `cell` with the result of `attach` unless it already holds a value.
/// Callers are serialized; a failed attach leaves `cell` empty.
fn attach_once<'a, T>(cell: &'a OnceLock<T>, attach: impl FnOnce() -> Result<T>) -> Result<&'a T> {
    let _guard = ATTACH.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = attach()?;
    Ok(cell.get_or_init(|| value))
}
