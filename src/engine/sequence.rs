//! Ticket number allocation
//!
//! The counter row is the source of truth. Active entries created today are
//! consulted as well, so a counter that was lost or restored from an older
//! copy can never hand out a number that is already on the board.

use super::clock::operating_day;
use crate::core::{SequenceCounter, TicketNumber};
use crate::error::{QueueError, Result};
use crate::storage::QueueStore;
use chrono::{FixedOffset, NaiveDate};

/// Mints `PREFIX-NNN` numbers, one operating day at a time
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    prefix: String,
    width: usize,
    max_attempts: u32,
}

impl SequenceAllocator {
    pub fn new(prefix: impl Into<String>, width: usize, max_attempts: u32) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Reserve the next number for `today`
    ///
    /// A lost compare-and-swap is retried; running out of attempts is a
    /// concurrency error the caller may retry as a whole.
    pub fn allocate<S: QueueStore>(
        &self,
        store: &S,
        today: NaiveDate,
        offset: FixedOffset,
    ) -> Result<TicketNumber> {
        for attempt in 1..=self.max_attempts {
            let counter = store.load_sequence()?;
            let from_counter = SequenceCounter::effective_index(counter.as_ref(), today);
            let from_entries = self.highest_active_index(store, today, offset)?;

            let index = from_counter
                .max(from_entries)
                .checked_add(1)
                .ok_or_else(|| QueueError::custom("Ticket sequence exhausted for today"))?;
            let next = SequenceCounter {
                operating_day: today,
                last_index: index,
            };

            if store.compare_and_swap_sequence(counter.as_ref(), &next)? {
                let number = TicketNumber::new(self.prefix.clone(), index, self.width);
                tracing::debug!(ticket = %number, attempt, "Allocated ticket number");
                return Ok(number);
            }
            tracing::debug!(attempt, "Sequence counter changed underneath us, retrying");
        }

        tracing::warn!(attempts = self.max_attempts, "Gave up allocating a ticket number");
        Err(QueueError::Concurrency {
            resource: "ticket sequence".to_string(),
            attempts: self.max_attempts,
        })
    }

    fn highest_active_index<S: QueueStore>(
        &self,
        store: &S,
        today: NaiveDate,
        offset: FixedOffset,
    ) -> Result<u32> {
        Ok(store
            .find_entries(|e| {
                e.ticket_number.prefix() == self.prefix
                    && operating_day(e.created_at, offset) == today
            })?
            .iter()
            .map(|e| e.ticket_number.index())
            .max()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QueueEntryBuilder;
    use crate::storage::{DayRepository, EntryRepository, MemoryStorage};
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_sequential_numbers() {
        let store = MemoryStorage::new();
        let allocator = SequenceAllocator::new("A", 3, 4);

        let numbers: Vec<String> = (0..3)
            .map(|_| allocator.allocate(&store, day(5), utc()).unwrap().to_string())
            .collect();
        assert_eq!(numbers, ["A-001", "A-002", "A-003"]);
    }

    #[test]
    fn test_new_day_restarts_numbering() {
        let store = MemoryStorage::new();
        let allocator = SequenceAllocator::new("A", 3, 4);

        allocator.allocate(&store, day(4), utc()).unwrap();
        allocator.allocate(&store, day(4), utc()).unwrap();
        let first_of_day = allocator.allocate(&store, day(5), utc()).unwrap();
        assert_eq!(first_of_day.to_string(), "A-001");
    }

    #[test]
    fn test_counter_behind_active_entries_is_skipped_forward() {
        let store = MemoryStorage::new();
        let entry = QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", 7, 3))
            .created_at(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap())
            .build();
        store.insert_entry(&entry).unwrap();

        let allocator = SequenceAllocator::new("A", 3, 4);
        assert_eq!(
            allocator.allocate(&store, day(5), utc()).unwrap().to_string(),
            "A-008"
        );
        assert_eq!(store.load_sequence().unwrap().unwrap().last_index, 8);
    }

    #[test]
    fn test_yesterdays_entries_do_not_raise_the_count() {
        let store = MemoryStorage::new();
        let entry = QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", 40, 3))
            .created_at(Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap())
            .build();
        store.insert_entry(&entry).unwrap();

        let allocator = SequenceAllocator::new("A", 3, 4);
        assert_eq!(
            allocator.allocate(&store, day(5), utc()).unwrap().to_string(),
            "A-001"
        );
    }

    #[test]
    fn test_padding_grows_past_width() {
        let store = MemoryStorage::new();
        store
            .compare_and_swap_sequence(
                None,
                &SequenceCounter {
                    operating_day: day(5),
                    last_index: 999,
                },
            )
            .unwrap();

        let allocator = SequenceAllocator::new("A", 3, 4);
        assert_eq!(
            allocator.allocate(&store, day(5), utc()).unwrap().to_string(),
            "A-1000"
        );
    }
}
