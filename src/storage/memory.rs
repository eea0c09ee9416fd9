//! In-process store used by tests, benchmarks and embedders without a disk

use super::repository::{ArchiveRepository, DayRepository, EntryRepository};
use crate::core::{ArchiveRecord, EntryId, QueueEntry, ResetLog, SequenceCounter};
use crate::error::{QueueError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    entries: Vec<QueueEntry>,
    archive: Vec<ArchiveRecord>,
    reset_log: Option<ResetLog>,
    sequence: Option<SequenceCounter>,
}

impl State {
    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == *id)
    }
}

/// Mutex-guarded store; every method is one critical section
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| QueueError::custom("Memory store lock poisoned"))
    }
}

impl EntryRepository for MemoryStorage {
    fn insert_entry(&self, entry: &QueueEntry) -> Result<()> {
        let mut state = self.lock()?;
        if state.position(&entry.id).is_some() {
            return Err(QueueError::custom(format!(
                "Entry {} already exists",
                entry.id
            )));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    fn load_entry(&self, id: &EntryId) -> Result<QueueEntry> {
        let state = self.lock()?;
        state
            .entries
            .iter()
            .find(|e| e.id == *id)
            .cloned()
            .ok_or_else(|| QueueError::EntryNotFound { id: id.to_string() })
    }

    fn load_entries(&self) -> Result<Vec<QueueEntry>> {
        let mut entries = self.lock()?.entries.clone();
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.ticket_number.cmp(&b.ticket_number))
        });
        Ok(entries)
    }

    fn replace_entry(&self, expected: &QueueEntry, updated: &QueueEntry) -> Result<bool> {
        let mut state = self.lock()?;
        let pos = state
            .position(&expected.id)
            .ok_or_else(|| QueueError::EntryNotFound {
                id: expected.id.to_string(),
            })?;
        if state.entries[pos] != *expected {
            return Ok(false);
        }
        state.entries[pos] = updated.clone();
        Ok(true)
    }

    fn delete_entry(&self, id: &EntryId) -> Result<()> {
        let mut state = self.lock()?;
        let pos = state
            .position(id)
            .ok_or_else(|| QueueError::EntryNotFound { id: id.to_string() })?;
        state.entries.remove(pos);
        Ok(())
    }

    fn clear_entries(&self) -> Result<usize> {
        let mut state = self.lock()?;
        let removed = state.entries.len();
        state.entries.clear();
        Ok(removed)
    }
}

impl ArchiveRepository for MemoryStorage {
    fn archive_entry(
        &self,
        expected: &QueueEntry,
        record: &ArchiveRecord,
    ) -> Result<Option<ArchiveRecord>> {
        let mut state = self.lock()?;
        let pos = state
            .position(&expected.id)
            .ok_or_else(|| QueueError::EntryNotFound {
                id: expected.id.to_string(),
            })?;
        if state.entries[pos] != *expected {
            return Ok(None);
        }

        let existing = state
            .archive
            .iter()
            .find(|r| r.entry_id == expected.id)
            .cloned();
        let stored = match existing {
            Some(existing) => existing,
            None => {
                state.archive.push(record.clone());
                record.clone()
            },
        };
        state.entries.remove(pos);
        Ok(Some(stored))
    }

    fn load_archive(&self) -> Result<Vec<ArchiveRecord>> {
        Ok(self.lock()?.archive.clone())
    }

    fn archive_contains(&self, entry_id: &EntryId) -> Result<bool> {
        Ok(self.lock()?.archive.iter().any(|r| r.entry_id == *entry_id))
    }
}

impl DayRepository for MemoryStorage {
    fn load_reset_log(&self) -> Result<Option<ResetLog>> {
        Ok(self.lock()?.reset_log)
    }

    fn reset_day(
        &self,
        expected: Option<NaiveDate>,
        today: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<usize>> {
        let mut state = self.lock()?;
        if state.reset_log.map(|log| log.last_reset_date) != expected {
            return Ok(None);
        }
        state.reset_log = Some(ResetLog {
            last_reset_date: today,
        });
        let before = state.entries.len();
        state.entries.retain(|e| e.created_at >= cutoff);
        Ok(Some(before - state.entries.len()))
    }

    fn load_sequence(&self) -> Result<Option<SequenceCounter>> {
        Ok(self.lock()?.sequence)
    }

    fn compare_and_swap_sequence(
        &self,
        expected: Option<&SequenceCounter>,
        next: &SequenceCounter,
    ) -> Result<bool> {
        let mut state = self.lock()?;
        if state.sequence.as_ref() != expected {
            return Ok(false);
        }
        state.sequence = Some(*next);
        Ok(true)
    }
}
