use crate::core::{ArchiveRecord, EntryId, QueueEntry, ResetLog, SequenceCounter};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};

/// Storage operations for active queue entries
///
/// Every method is atomic with respect to the other methods of the same store,
/// including calls from other threads or processes sharing it.
pub trait EntryRepository: Send + Sync {
    /// Inserts a new entry
    fn insert_entry(&self, entry: &QueueEntry) -> Result<()>;

    /// Loads an entry by ID, failing with `EntryNotFound` if it is gone
    fn load_entry(&self, id: &EntryId) -> Result<QueueEntry>;

    /// Loads all active entries in creation order
    fn load_entries(&self) -> Result<Vec<QueueEntry>>;

    /// Replaces an entry only if the stored copy still equals `expected`
    ///
    /// Returns `false` when another writer changed the entry first.
    fn replace_entry(&self, expected: &QueueEntry, updated: &QueueEntry) -> Result<bool>;

    /// Deletes an entry by ID
    fn delete_entry(&self, id: &EntryId) -> Result<()>;

    /// Deletes every active entry and returns how many were removed
    fn clear_entries(&self) -> Result<usize>;

    /// Finds entries matching a predicate
    fn find_entries<F>(&self, predicate: F) -> Result<Vec<QueueEntry>>
    where
        Self: Sized,
        F: Fn(&QueueEntry) -> bool,
    {
        Ok(self.load_entries()?.into_iter().filter(predicate).collect())
    }

    /// Counts entries matching a predicate
    fn count_entries<F>(&self, predicate: F) -> Result<usize>
    where
        Self: Sized,
        F: Fn(&QueueEntry) -> bool,
    {
        Ok(self.load_entries()?.iter().filter(|e| predicate(e)).count())
    }
}

/// Append-only storage for served tickets
pub trait ArchiveRepository: Send + Sync {
    /// Archives an entry and removes it from the active queue as one unit
    ///
    /// The record is written before the entry is deleted. If a record for the
    /// same entry already exists (an earlier attempt stopped half-way) it is
    /// kept and returned instead of writing a second one. Returns `None` when
    /// the stored entry no longer equals `expected`.
    fn archive_entry(
        &self,
        expected: &QueueEntry,
        record: &ArchiveRecord,
    ) -> Result<Option<ArchiveRecord>>;

    /// Loads every archived record
    fn load_archive(&self) -> Result<Vec<ArchiveRecord>>;

    /// Whether a record exists for an entry
    fn archive_contains(&self, entry_id: &EntryId) -> Result<bool>;

    /// Loads records archived within `[start, end)`
    fn load_archive_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ArchiveRecord>> {
        Ok(self
            .load_archive()?
            .into_iter()
            .filter(|r| r.archived_at >= start && r.archived_at < end)
            .collect())
    }
}

/// Singleton rows scoped to the operating day
pub trait DayRepository: Send + Sync {
    /// Reads the reset log, `None` before the first reset
    fn load_reset_log(&self) -> Result<Option<ResetLog>>;

    /// Stamps a new reset date and clears stale entries as one unit
    ///
    /// Succeeds only if the stored reset date still equals `expected`. Entries
    /// created before `cutoff` are deleted; later ones are left alone. Returns
    /// the number of deleted entries, or `None` if another caller won.
    fn reset_day(
        &self,
        expected: Option<NaiveDate>,
        today: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<usize>>;

    /// Reads the ticket counter, `None` before the first allocation
    fn load_sequence(&self) -> Result<Option<SequenceCounter>>;

    /// Replaces the counter only if it still equals `expected`
    fn compare_and_swap_sequence(
        &self,
        expected: Option<&SequenceCounter>,
        next: &SequenceCounter,
    ) -> Result<bool>;
}

/// Combined store trait
pub trait QueueStore: EntryRepository + ArchiveRepository + DayRepository {}

/// Implementation of `QueueStore` for types that implement all three traits
impl<T> QueueStore for T where T: EntryRepository + ArchiveRepository + DayRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArchiveRecord, QueueEntryBuilder, Status, TicketNumber};
    use crate::error::QueueError;
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_entry(index: u32, name: &str) -> QueueEntry {
        QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", index, 3))
            .display_name(name)
            .created_at(Utc::now() + Duration::milliseconds(i64::from(index)))
            .build()
    }

    fn file_store() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".walkin-queue"));
        storage.ensure_directories().unwrap();
        (temp_dir, storage)
    }

    fn check_insert_load_delete<S: QueueStore>(store: &S) {
        let first = create_test_entry(1, "Ana");
        let second = create_test_entry(2, "Bo");
        store.insert_entry(&second).unwrap();
        store.insert_entry(&first).unwrap();

        let loaded = store.load_entry(&first.id).unwrap();
        assert_eq!(loaded, first);

        let all = store.load_entries().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id, "entries come back in creation order");

        store.delete_entry(&first.id).unwrap();
        assert!(matches!(
            store.load_entry(&first.id),
            Err(QueueError::EntryNotFound { .. })
        ));
        assert!(matches!(
            store.delete_entry(&first.id),
            Err(QueueError::EntryNotFound { .. })
        ));
        assert_eq!(store.count_entries(|_| true).unwrap(), 1);
    }

    fn check_replace_is_conditional<S: QueueStore>(store: &S) {
        let entry = create_test_entry(1, "Ana");
        store.insert_entry(&entry).unwrap();

        let mut serving = entry.clone();
        serving.status = Status::Serving;
        serving.served_at = Some(Utc::now());
        assert!(store.replace_entry(&entry, &serving).unwrap());

        // A second writer still holding the old copy loses.
        let mut renamed = entry.clone();
        renamed.display_name = "Ana R".into();
        assert!(!store.replace_entry(&entry, &renamed).unwrap());
        assert_eq!(store.load_entry(&entry.id).unwrap().status, Status::Serving);
    }

    fn check_archive_is_exactly_once<S: QueueStore>(store: &S) {
        let mut entry = create_test_entry(1, "Ana");
        entry.status = Status::Serving;
        entry.served_at = Some(Utc::now());
        store.insert_entry(&entry).unwrap();

        let record = ArchiveRecord::from_entry(&entry, Utc::now());
        let archived = store.archive_entry(&entry, &record).unwrap();
        assert_eq!(archived, Some(record.clone()));
        assert!(store.archive_contains(&entry.id).unwrap());
        assert!(store.load_entries().unwrap().is_empty());

        assert!(matches!(
            store.archive_entry(&entry, &record),
            Err(QueueError::EntryNotFound { .. })
        ));
        assert_eq!(store.load_archive().unwrap().len(), 1);
    }

    fn check_archive_replays_half_finished_attempt<S: QueueStore>(store: &S) {
        let mut entry = create_test_entry(1, "Ana");
        entry.status = Status::Serving;
        store.insert_entry(&entry).unwrap();

        let first = ArchiveRecord::from_entry(&entry, Utc::now());
        store.archive_entry(&entry, &first).unwrap();

        // Simulate a crash between the archive write and the delete.
        store.insert_entry(&entry).unwrap();
        let retry = ArchiveRecord::from_entry(&entry, Utc::now() + Duration::seconds(5));
        let replayed = store.archive_entry(&entry, &retry).unwrap();

        assert_eq!(replayed, Some(first));
        assert_eq!(store.load_archive().unwrap().len(), 1);
        assert!(store.load_entries().unwrap().is_empty());
    }

    fn check_archive_rejects_stale_copy<S: QueueStore>(store: &S) {
        let entry = create_test_entry(1, "Ana");
        store.insert_entry(&entry).unwrap();

        let mut stale = entry.clone();
        stale.status = Status::Serving;
        let record = ArchiveRecord::from_entry(&stale, Utc::now());
        assert_eq!(store.archive_entry(&stale, &record).unwrap(), None);
        assert!(store.load_archive().unwrap().is_empty());
        assert_eq!(store.load_entries().unwrap().len(), 1);
    }

    fn check_reset_day<S: QueueStore>(store: &S) {
        let yesterday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let cutoff = today.and_hms_opt(0, 0, 0).unwrap().and_utc();

        let old = QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", 1, 3))
            .created_at(cutoff - Duration::hours(3))
            .build();
        let fresh = QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", 1, 3))
            .created_at(cutoff + Duration::minutes(1))
            .build();
        store.insert_entry(&old).unwrap();
        store.insert_entry(&fresh).unwrap();

        assert_eq!(store.reset_day(None, yesterday, cutoff).unwrap(), Some(1));
        // Losing compare-and-swap: expected value is stale.
        assert_eq!(store.reset_day(None, today, cutoff).unwrap(), None);
        assert_eq!(
            store.reset_day(Some(yesterday), today, cutoff).unwrap(),
            Some(0)
        );
        assert_eq!(
            store.load_reset_log().unwrap(),
            Some(ResetLog {
                last_reset_date: today
            })
        );

        let remaining = store.load_entries().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, fresh.id);
    }

    fn check_sequence_cas<S: QueueStore>(store: &S) {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let first = SequenceCounter {
            operating_day: day,
            last_index: 1,
        };
        let second = SequenceCounter {
            operating_day: day,
            last_index: 2,
        };

        assert!(store.load_sequence().unwrap().is_none());
        assert!(store.compare_and_swap_sequence(None, &first).unwrap());
        assert!(!store.compare_and_swap_sequence(None, &second).unwrap());
        assert!(store.compare_and_swap_sequence(Some(&first), &second).unwrap());
        assert_eq!(store.load_sequence().unwrap(), Some(second));
    }

    fn check_clear<S: QueueStore>(store: &S) {
        for i in 1..=3 {
            store.insert_entry(&create_test_entry(i, "Guest")).unwrap();
        }
        assert_eq!(store.clear_entries().unwrap(), 3);
        assert_eq!(store.clear_entries().unwrap(), 0);
    }

    macro_rules! store_tests {
        ($($name:ident => $check:ident),* $(,)?) => {
            $(
                mod $name {
                    use super::*;

                    #[test]
                    fn file_storage() {
                        let (_temp_dir, store) = file_store();
                        $check(&store);
                    }

                    #[test]
                    fn memory_storage() {
                        $check(&MemoryStorage::new());
                    }
                }
            )*
        };
    }

    store_tests! {
        insert_load_delete => check_insert_load_delete,
        replace_is_conditional => check_replace_is_conditional,
        archive_is_exactly_once => check_archive_is_exactly_once,
        archive_replays_half_finished_attempt => check_archive_replays_half_finished_attempt,
        archive_rejects_stale_copy => check_archive_rejects_stale_copy,
        reset_day => check_reset_day,
        sequence_cas => check_sequence_cas,
        clear => check_clear,
    }
}
