mod reader;
mod region;
mod snapshot;

#[cfg(test)]
pub mod mock;

pub use reader::ReadMemory;
pub use region::{MemoryRegion, Module, Section};
pub use snapshot::MemorySnapshot;

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
