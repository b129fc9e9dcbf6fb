//! CLI command implementations.

pub mod chain;
pub mod hex_utils;
pub mod hexdump;
pub mod scan;
pub mod snapshot;
pub mod watch;
