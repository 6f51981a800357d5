//! Sector device implementations

mod memory;

pub use memory::MemorySectorDevice;
