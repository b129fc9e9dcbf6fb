pub mod layout;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod process;
mod reader;
mod safe;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
pub use process::ProcessHandle;
pub use reader::{MemoryRegion, PointerWidth, QueryRegions, ReadMemory, protect};
pub use safe::{MIN_OBJECT_ADDRESS, Readout, SafeReader, field_address};
