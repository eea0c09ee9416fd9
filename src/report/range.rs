use crate::engine::clock::start_of_day;
use crate::error::{QueueError, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

/// Named date ranges relative to the current operating day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePreset {
    #[default]
    Today,
    Yesterday,
    /// Monday through Sunday of the current week
    ThisWeek,
    ThisMonth,
}

impl DatePreset {
    /// Inclusive calendar bounds of this preset
    pub fn bounds(self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match self {
            Self::Today => Ok((today, today)),
            Self::Yesterday => {
                let yesterday = today - Duration::days(1);
                Ok((yesterday, yesterday))
            },
            Self::ThisWeek => {
                let start =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                Ok((start, start + Duration::days(6)))
            },
            Self::ThisMonth => {
                let start = today
                    .with_day(1)
                    .ok_or_else(|| QueueError::custom("Invalid month start"))?;
                let next_month = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                }
                .ok_or_else(|| QueueError::custom("Invalid month end"))?;
                Ok((start, next_month - Duration::days(1)))
            },
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DatePreset {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "this_week" | "week" | "thisweek" => Ok(Self::ThisWeek),
            "this_month" | "month" | "thismonth" => Ok(Self::ThisMonth),
            other => Err(QueueError::validation(format!(
                "Invalid preset: {other}. Must be one of: today, yesterday, this_week, this_month"
            ))),
        }
    }
}

/// Which archived tickets a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Inclusive calendar dates; a missing bound copies the other one
    Explicit {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Preset(DatePreset),
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::Preset(DatePreset::Today)
    }
}

impl RangeSpec {
    /// Build a range from raw request parameters
    ///
    /// Explicit dates take precedence over a preset. Blank strings count as
    /// absent; anything else must be a valid `YYYY-MM-DD` date.
    pub fn from_params(
        from: Option<&str>,
        to: Option<&str>,
        preset: Option<&str>,
    ) -> Result<Self> {
        let from = non_blank(from).map(parse_date).transpose()?;
        let to = non_blank(to).map(parse_date).transpose()?;

        if from.is_some() || to.is_some() {
            if non_blank(preset).is_some() {
                tracing::debug!("Explicit dates given, ignoring preset");
            }
            return Ok(Self::Explicit { from, to });
        }

        match non_blank(preset) {
            Some(preset) => Ok(Self::Preset(preset.parse()?)),
            None => Ok(Self::default()),
        }
    }

    /// Inclusive calendar bounds relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match *self {
            Self::Explicit { from, to } => {
                let (from, to) = match (from, to) {
                    (Some(from), Some(to)) => (from, to),
                    (Some(day), None) | (None, Some(day)) => (day, day),
                    (None, None) => (today, today),
                };
                if from > to {
                    return Err(QueueError::validation(format!(
                        "Start date {from} is after end date {to}"
                    )));
                }
                Ok((from, to))
            },
            Self::Preset(preset) => preset.bounds(today),
        }
    }

    /// Half-open instant interval `[start of from, start of the day after to)`
    pub fn interval(
        &self,
        today: NaiveDate,
        offset: FixedOffset,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let (from, to) = self.resolve(today)?;
        let after_to = to
            .succ_opt()
            .ok_or_else(|| QueueError::validation(format!("Date out of range: {to}")))?;
        Ok((start_of_day(from, offset), start_of_day(after_to, offset)))
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(preset) => write!(f, "{preset}"),
            Self::Explicit { from, to } => {
                let show = |d: &Option<NaiveDate>| d.map_or_else(|| "*".to_string(), |d| d.to_string());
                write!(f, "{}..{}", show(from), show(to))
            },
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| QueueError::InvalidDate {
        input: input.to_string(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
