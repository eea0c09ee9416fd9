//! Shared application state

use crate::engine::QueueEngine;
use crate::error::Result;
use crate::storage::QueueStore;
use std::sync::Arc;

use super::error::ApiError;

/// State handed to every handler
pub struct AppState<S> {
    pub engine: Arc<QueueEngine<S>>,
}

// Manual impl: the engine sits behind an Arc, so `S` need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S: QueueStore + 'static> AppState<S> {
    pub fn new(engine: QueueEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Run an engine call on the blocking pool
    ///
    /// Store operations take file locks and do synchronous I/O.
    pub async fn run<T, F>(&self, f: F) -> std::result::Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&QueueEngine<S>) -> Result<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        Ok(tokio::task::spawn_blocking(move || f(&engine)).await??)
    }
}
