use crate::auth::{Caller, Role};
use crate::cli::utils::find_data_dir;
use crate::config::QueueConfig;
use crate::core::QueueEntry;
use crate::engine::QueueEngine;
use crate::error::{QueueError, Result};
use crate::storage::FileStorage;
use std::path::PathBuf;

/// Common context for all handler operations
pub struct HandlerContext {
    pub data_dir: PathBuf,
    pub engine: QueueEngine<FileStorage>,
}

impl HandlerContext {
    /// Open the queue in `data_dir`, or the nearest one above the current directory
    pub fn new(data_dir: Option<&str>) -> Result<Self> {
        let data_dir = find_data_dir(data_dir)?;
        let storage = FileStorage::new(&data_dir);
        if !storage.is_initialized() {
            return Err(QueueError::NotInitialized);
        }

        let config = QueueConfig::load(&data_dir)?;
        let storage = storage.with_lock_config(config.lock.clone());
        let engine = QueueEngine::new(storage, config)?;

        Ok(Self { data_dir, engine })
    }

    /// Resolve a ticket number or entry id
    pub fn resolve_entry(&self, reference: &str) -> Result<QueueEntry> {
        self.engine.find_entry(reference)
    }
}

/// Build the caller identity from the global `--role` and `--operator` flags
pub fn caller_from_args(role: &str, operator: Option<&str>) -> Result<Caller> {
    let role: Role = role.parse()?;
    let name = operator
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok(Caller::with_role(name, role))
}
