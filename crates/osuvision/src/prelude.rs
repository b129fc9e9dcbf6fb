//! Common imports for consumers polling the client.
//!
//! ```ignore
//! use osuvision::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::game::{GameMode, Mods, OsuMode};
pub use crate::memory::{ReadMemory, Readout};
pub use crate::mirror::{GameSnapshot, Memo};
pub use crate::session::Session;
