//! # osuvision
//!
//! Read-only memory introspection for the osu! stable client.
//!
//! This crate provides:
//! - Windows process memory reading with fail-closed typed reads
//! - Signature scanning over the target's whole address space
//! - Pointer chain resolution from named signature addresses
//! - Typed views of the client state (clock, screen, beatmap, live gameplay)
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables hexdump and region statistics helpers used by
//!   the CLI's diagnostic commands.
//! - `mock`: Exposes the in-memory mock process outside of this crate's tests.

pub mod config;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod game;
pub mod memory;
pub mod mirror;
pub mod offset;
pub mod prelude;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use game::{GameMode, Mods, OsuMode, base_unstable_rate, unstable_rate};
pub use memory::{
    MemoryRegion, PointerWidth, ProcessHandle, QueryRegions, ReadMemory, Readout, SafeReader,
};
pub use mirror::{
    AudioEngine, Beatmap, BeatmapSnapshot, GameBase, GamePlay, GameSnapshot, GameplaySnapshot,
    Memo, Player, PlayerSnapshot,
};
pub use offset::{
    AddressTable, ChainStep, MIN_VALID_ADDRESS, ProcessMemoryScanner, ScanStats, Signature,
    SignatureCatalog, SignatureDescriptor, TableEntry, follow_chain, load_signatures,
    resolve_chain, trace_chain,
};
pub use session::Session;

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::{RegionSummary, format_hexdump, summarize_regions};
