//! YAML file store
//!
//! Layout under the data directory:
//!
//! ```text
//! entries/<entry id>.yaml   active queue
//! archive/<entry id>.yaml   served tickets
//! reset_log.yaml            last reset date
//! sequence.yaml             ticket counter
//! .lock                     advisory write lock
//! ```
//!
//! Writers hold the lock for the whole read-compare-write of each operation.
//! Files are replaced through a rename so readers never see half a document and
//! can run without the lock.

use super::lock::FileLock;
use super::repository::{ArchiveRepository, DayRepository, EntryRepository};
use crate::config::LockConfig;
use crate::core::{ArchiveRecord, EntryId, QueueEntry, ResetLog, SequenceCounter};
use crate::error::{QueueError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ENTRIES_DIR: &str = "entries";
const ARCHIVE_DIR: &str = "archive";
const RESET_LOG_FILE: &str = "reset_log.yaml";
const SEQUENCE_FILE: &str = "sequence.yaml";
const LOCK_FILE: &str = ".lock";

/// File-backed queue store
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
    lock: LockConfig,
}

impl FileStorage {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            lock: LockConfig::default(),
        }
    }

    /// Use custom lock settings
    #[must_use]
    pub fn with_lock_config(mut self, lock: LockConfig) -> Self {
        self.lock = lock;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether the data directory has been initialized
    pub fn is_initialized(&self) -> bool {
        self.entries_dir().is_dir() && self.archive_dir().is_dir()
    }

    /// Create the directory layout
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(self.entries_dir())?;
        fs::create_dir_all(self.archive_dir())?;
        Ok(())
    }

    fn entries_dir(&self) -> PathBuf {
        self.base_dir.join(ENTRIES_DIR)
    }

    fn archive_dir(&self) -> PathBuf {
        self.base_dir.join(ARCHIVE_DIR)
    }

    fn entry_path(&self, id: &EntryId) -> PathBuf {
        self.entries_dir().join(format!("{id}.yaml"))
    }

    fn archive_path(&self, entry_id: &EntryId) -> PathBuf {
        self.archive_dir().join(format!("{entry_id}.yaml"))
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = FileLock::acquire(&self.base_dir.join(LOCK_FILE), &self.lock)?;
        f()
    }

    fn read_entry_file(&self, id: &EntryId) -> Result<QueueEntry> {
        read_yaml(&self.entry_path(id))?.ok_or_else(|| QueueError::EntryNotFound {
            id: id.to_string(),
        })
    }
}

/// Read a YAML document, `None` if the file does not exist
fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_yaml::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a YAML document through a temporary file and a rename
fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| QueueError::custom(format!("Invalid path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Remove a file, treating "already gone" as success
fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Load every `*.yaml` document in a directory
///
/// Files deleted between listing and reading are skipped.
fn read_dir_yaml<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(QueueError::NotInitialized),
        Err(e) => return Err(e.into()),
    };

    let mut items = Vec::new();
    for dir_entry in listing {
        let path = dir_entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        if let Some(item) = read_yaml(&path)? {
            items.push(item);
        }
    }
    Ok(items)
}

impl EntryRepository for FileStorage {
    fn insert_entry(&self, entry: &QueueEntry) -> Result<()> {
        self.with_lock(|| {
            let path = self.entry_path(&entry.id);
            if path.exists() {
                return Err(QueueError::custom(format!(
                    "Entry {} already exists",
                    entry.id
                )));
            }
            write_yaml(&path, entry)
        })
    }

    fn load_entry(&self, id: &EntryId) -> Result<QueueEntry> {
        self.read_entry_file(id)
    }

    fn load_entries(&self) -> Result<Vec<QueueEntry>> {
        let mut entries: Vec<QueueEntry> = read_dir_yaml(&self.entries_dir())?;
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.ticket_number.cmp(&b.ticket_number))
        });
        Ok(entries)
    }

    fn replace_entry(&self, expected: &QueueEntry, updated: &QueueEntry) -> Result<bool> {
        self.with_lock(|| {
            let current = self.read_entry_file(&expected.id)?;
            if current != *expected {
                return Ok(false);
            }
            write_yaml(&self.entry_path(&expected.id), updated)?;
            Ok(true)
        })
    }

    fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.with_lock(|| {
            if remove_if_exists(&self.entry_path(id))? {
                Ok(())
            } else {
                Err(QueueError::EntryNotFound { id: id.to_string() })
            }
        })
    }

    fn clear_entries(&self) -> Result<usize> {
        self.with_lock(|| {
            let entries = self.load_entries()?;
            let mut removed = 0;
            for entry in &entries {
                if remove_if_exists(&self.entry_path(&entry.id))? {
                    removed += 1;
                }
            }
            Ok(removed)
        })
    }
}

impl ArchiveRepository for FileStorage {
    fn archive_entry(
        &self,
        expected: &QueueEntry,
        record: &ArchiveRecord,
    ) -> Result<Option<ArchiveRecord>> {
        self.with_lock(|| {
            let current = self.read_entry_file(&expected.id)?;
            if current != *expected {
                return Ok(None);
            }

            let archive_path = self.archive_path(&expected.id);
            let stored = match read_yaml::<ArchiveRecord>(&archive_path)? {
                Some(existing) => {
                    tracing::warn!(
                        ticket = %existing.ticket_number,
                        "Archive record already present, finishing interrupted completion"
                    );
                    existing
                },
                None => {
                    write_yaml(&archive_path, record)?;
                    record.clone()
                },
            };

            remove_if_exists(&self.entry_path(&expected.id))?;
            Ok(Some(stored))
        })
    }

    fn load_archive(&self) -> Result<Vec<ArchiveRecord>> {
        read_dir_yaml(&self.archive_dir())
    }

    fn archive_contains(&self, entry_id: &EntryId) -> Result<bool> {
        Ok(self.archive_path(entry_id).exists())
    }
}

impl DayRepository for FileStorage {
    fn load_reset_log(&self) -> Result<Option<ResetLog>> {
        read_yaml(&self.base_dir.join(RESET_LOG_FILE))
    }

    fn reset_day(
        &self,
        expected: Option<NaiveDate>,
        today: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<usize>> {
        self.with_lock(|| {
            let path = self.base_dir.join(RESET_LOG_FILE);
            let current = read_yaml::<ResetLog>(&path)?.map(|log| log.last_reset_date);
            if current != expected {
                return Ok(None);
            }

            write_yaml(
                &path,
                &ResetLog {
                    last_reset_date: today,
                },
            )?;

            let mut removed = 0;
            for entry in self.load_entries()? {
                if entry.created_at < cutoff && remove_if_exists(&self.entry_path(&entry.id))? {
                    removed += 1;
                }
            }
            Ok(Some(removed))
        })
    }

    fn load_sequence(&self) -> Result<Option<SequenceCounter>> {
        read_yaml(&self.base_dir.join(SEQUENCE_FILE))
    }

    fn compare_and_swap_sequence(
        &self,
        expected: Option<&SequenceCounter>,
        next: &SequenceCounter,
    ) -> Result<bool> {
        self.with_lock(|| {
            let path = self.base_dir.join(SEQUENCE_FILE);
            let current = read_yaml::<SequenceCounter>(&path)?;
            if current.as_ref() != expected {
                return Ok(false);
            }
            write_yaml(&path, next)?;
            Ok(true)
        })
    }
}
