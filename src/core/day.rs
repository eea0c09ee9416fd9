use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Singleton record of the last operating day the active queue was reset for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetLog {
    pub last_reset_date: NaiveDate,
}

/// Durable ticket counter for one operating day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    pub operating_day: NaiveDate,
    pub last_index: u32,
}

impl SequenceCounter {
    /// Index the counter stands at for `today`; a stale day counts as zero
    pub fn effective_index(counter: Option<&Self>, today: NaiveDate) -> u32 {
        counter
            .filter(|c| c.operating_day == today)
            .map_or(0, |c| c.last_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_index_restarts_on_new_day() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let counter = SequenceCounter {
            operating_day: monday,
            last_index: 12,
        };

        assert_eq!(SequenceCounter::effective_index(Some(&counter), monday), 12);
        assert_eq!(SequenceCounter::effective_index(Some(&counter), tuesday), 0);
        assert_eq!(SequenceCounter::effective_index(None, monday), 0);
    }
}
