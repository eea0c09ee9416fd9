use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use std::sync::Mutex;

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to an instant
    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }
}

/// Calendar day of an instant in the operating timezone
pub fn operating_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First instant of a calendar day in the operating timezone
pub fn start_of_day(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = day.and_time(chrono::NaiveTime::MIN);
    // A fixed offset has no gaps, so the local time always maps to one instant.
    (local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_operating_day_respects_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();

        assert_eq!(
            operating_day(instant, utc),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(
            operating_day(instant, manila),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }

    #[test]
    fn test_start_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            start_of_day(day, manila),
            Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), start + Duration::hours(2));
    }

    #[test]
    fn test_mock_clock() {
        let fixed = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().return_const(fixed);
        assert_eq!(clock.now(), fixed);
    }
}
