mod chain;
mod scanner;
mod signature;
mod table;

pub use chain::*;
pub use scanner::*;
pub use signature::*;
pub use table::*;
