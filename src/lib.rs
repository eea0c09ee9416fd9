//! walkin-queue - a walk-in visit queue
//!
//! This crate provides the engine behind a walk-in waiting room:
//! - Sequential ticket numbers that restart every operating day
//! - A waiting → serving → done lifecycle with priority-first serving order
//! - Exactly-once archival of served tickets
//! - Date-range reports over the archive with JSON, YAML and CSV export

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::fn_params_excessive_bools)]
#![allow(clippy::map_unwrap_or)]

//! # Concurrent Safety
//!
//! Any number of processes may share one data directory. Every store
//! mutation holds a lock file, and the engine commits state changes with
//! compare-and-swap so that two writers racing on the same ticket, counter
//! or day reset never both win.
//!
//! # Example
//!
//! ```rust,ignore
//! use walkin_queue::{JoinRequest, QueueEngine};
//! use walkin_queue::auth::Caller;
//! use walkin_queue::config::QueueConfig;
//! use walkin_queue::storage::FileStorage;
//!
//! let storage = FileStorage::new(".walkin-queue");
//! storage.ensure_directories()?;
//! let engine = QueueEngine::new(storage, QueueConfig::default())?;
//!
//! let entry = engine.join(JoinRequest::new("Ana Reyes").service("Lab"))?;
//! let staff = Caller::staff("desk-1");
//! engine.advance_to_serving(&staff, &entry.id)?;
//! let record = engine.complete_serving(&staff, &entry.id)?;
//! ```

#[cfg(feature = "api")]
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod report;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use engine::{JoinRequest, QueueEngine};
pub use error::{QueueError, Result};
