mod enums;
mod mods;
mod timing;

pub use enums::*;
pub use mods::*;
pub use timing::*;
