//! Data directory discovery

use crate::error::{QueueError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the data directory created by `init`
pub const DATA_DIR_NAME: &str = ".walkin-queue";

/// Locate the queue data directory
///
/// An explicit `data_dir` is used as-is. Otherwise the current directory and
/// its ancestors are searched for a `.walkin-queue` directory.
pub fn find_data_dir(data_dir: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(PathBuf::from(dir));
    }

    let start = env::current_dir()?;
    find_data_dir_from(&start).ok_or(QueueError::NotInitialized)
}

/// Search `start` and its ancestors for a data directory
pub fn find_data_dir_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Where `init` should create the data directory
pub fn init_data_dir(data_dir: Option<&str>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(env::current_dir()?.join(DATA_DIR_NAME)),
    }
}
