//! Persistence for the queue
//!
//! [`FileStorage`] keeps YAML files under the data directory and is shared
//! safely between processes. [`MemoryStorage`] keeps everything in-process.

mod file;
mod lock;
mod memory;
mod repository;

pub use file::FileStorage;
pub use lock::FileLock;
pub use memory::MemoryStorage;
pub use repository::{ArchiveRepository, DayRepository, EntryRepository, QueueStore};
