//! Lazy daily reset of the active queue

use super::clock::start_of_day;
use crate::error::Result;
use crate::storage::QueueStore;
use chrono::{FixedOffset, NaiveDate};

/// Outcome of [`ResetController::ensure_current_day`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The log already names today
    Current,
    /// This call stamped today and removed `removed` stale entries
    Reset { removed: usize },
    /// Another caller reset concurrently
    LostRace,
}

/// Clears yesterday's queue the first time anyone looks at it today
#[derive(Debug, Clone, Copy)]
pub struct ResetController {
    offset: FixedOffset,
}

impl ResetController {
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Make sure the active queue belongs to `today`
    ///
    /// Idempotent. Only entries created before the start of `today` are ever
    /// removed, so a caller that lost the race cannot wipe fresh joins.
    pub fn ensure_current_day<S: QueueStore>(
        &self,
        store: &S,
        today: NaiveDate,
    ) -> Result<ResetOutcome> {
        let observed = store.load_reset_log()?.map(|log| log.last_reset_date);
        match observed {
            Some(last) if last == today => return Ok(ResetOutcome::Current),
            Some(last) if last > today => {
                tracing::warn!(%last, %today, "Reset log is ahead of the clock, leaving queue alone");
                return Ok(ResetOutcome::Current);
            },
            _ => {},
        }

        let cutoff = start_of_day(today, self.offset);
        match store.reset_day(observed, today, cutoff)? {
            Some(removed) => {
                tracing::info!(%today, removed, "Reset active queue");
                Ok(ResetOutcome::Reset { removed })
            },
            None => {
                tracing::debug!(%today, "Queue was reset by another caller");
                Ok(ResetOutcome::LostRace)
            },
        }
    }
}
