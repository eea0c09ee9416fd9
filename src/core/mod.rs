//! Core domain types for the walk-in queue

mod archive;
mod builders;
mod day;
mod entry;
pub mod update;

pub use archive::ArchiveRecord;
pub use builders::{ArchiveRecordBuilder, QueueEntryBuilder};
pub use day::{ResetLog, SequenceCounter};
pub use entry::{EntryId, PriorityClass, QueueEntry, Status, TicketNumber};
pub use update::EntryUpdate;
