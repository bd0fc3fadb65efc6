pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;
