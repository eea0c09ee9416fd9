//! Test utilities for walkin-queue
//!
//! This module provides common test fixtures and utilities to reduce
//! duplication in test code across the codebase.

#![cfg(test)]

use crate::auth::Caller;
use crate::config::QueueConfig;
use crate::core::{PriorityClass, QueueEntry};
use crate::engine::{JoinRequest, ManualClock, QueueEngine};
use crate::storage::FileStorage;
use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// 09:00 UTC on a Tuesday
pub fn tuesday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap()
}

/// Configuration pinned to UTC so tests do not depend on the host timezone
pub fn utc_config() -> QueueConfig {
    QueueConfig {
        utc_offset_minutes: Some(0),
        ..QueueConfig::default()
    }
}

/// Test fixture for a file-backed queue in a temporary directory
pub struct TestQueue {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub clock: Arc<ManualClock>,
    pub engine: QueueEngine<FileStorage>,
}

impl TestQueue {
    /// Create an initialized queue with the clock at [`tuesday_morning`]
    pub fn new() -> Self {
        Self::with_config(utc_config())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".walkin-queue");

        let storage = FileStorage::new(&data_dir);
        storage
            .ensure_directories()
            .expect("Failed to create queue dirs");
        config.save(&data_dir).expect("Failed to save config");

        let clock = Arc::new(ManualClock::new(tuesday_morning()));
        let engine = QueueEngine::new(storage, config)
            .expect("Failed to build engine")
            .with_clock(clock.clone());

        Self {
            temp_dir,
            data_dir,
            clock,
            engine,
        }
    }

    /// The data directory as a string, for handler calls
    pub fn data_dir_str(&self) -> &str {
        self.data_dir.to_str().expect("Invalid path")
    }

    /// Add a regular visitor
    pub fn join(&self, name: &str) -> QueueEntry {
        self.engine
            .join(JoinRequest::new(name))
            .expect("Failed to join")
    }

    /// Add a priority visitor
    pub fn join_priority(&self, name: &str) -> QueueEntry {
        self.engine
            .join(JoinRequest::new(name).priority(PriorityClass::Priority))
            .expect("Failed to join")
    }

    /// Join, serve and complete a visitor so it lands in the archive
    pub fn serve_and_complete(&self, name: &str) -> QueueEntry {
        let staff = Caller::staff("test-desk");
        let entry = self.join(name);
        self.engine
            .advance_to_serving(&staff, &entry.id)
            .expect("Failed to serve");
        self.engine
            .complete_serving(&staff, &entry.id)
            .expect("Failed to complete");
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ArchiveRepository, EntryRepository};

    #[test]
    fn test_fixture_round_trip() {
        let queue = TestQueue::new();
        queue.join("Ana Reyes");
        let done = queue.serve_and_complete("Ben Ortiz");

        assert_eq!(queue.engine.store().load_entries().unwrap().len(), 1);
        assert!(queue.engine.store().archive_contains(&done.id).unwrap());
        assert_eq!(done.ticket_number.to_string(), "A-002");
    }
}
