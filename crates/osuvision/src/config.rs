//! Attach-time configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Executable name of the osu! stable client
pub const DEFAULT_PROCESS_NAME: &str = "osu!.exe";

/// Default signature descriptor file
pub const DEFAULT_SIGNATURES_FILE: &str = "signatures.json";

/// Upper bound on .NET string length, in UTF-16 code units
pub const DEFAULT_STRING_CAP: usize = 4096;

/// Default interval between polls (roughly one 60 Hz frame)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process to attach to, matched case-insensitively
    pub process_name: String,
    /// Module whose load base is used for module-relative signatures.
    /// Falls back to `process_name` when unset.
    pub module_name: Option<String>,
    /// Signature descriptor (JSON)
    pub signatures: PathBuf,
    /// Longest .NET string that will be read
    pub string_cap: usize,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            module_name: None,
            signatures: PathBuf::from(DEFAULT_SIGNATURES_FILE),
            string_cap: DEFAULT_STRING_CAP,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Config {
    pub fn module_name(&self) -> &str {
        self.module_name.as_deref().unwrap_or(&self.process_name)
    }
}
