//! Reporting over archived tickets
//!
//! Reports only read the archive; the active queue is never consulted.

mod export;
mod range;
mod sort;
mod summary;

pub use export::ExportFormat;
pub use range::{DatePreset, RangeSpec, parse_date};
pub use sort::{ReportSort, SortField};
pub use summary::{ReportSummary, UNSPECIFIED_SERVICE};

/// A report request: which days, in which order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportQuery {
    pub range: RangeSpec,
    pub sort: ReportSort,
}

impl ReportQuery {
    pub const fn new(range: RangeSpec, sort: ReportSort) -> Self {
        Self { range, sort }
    }

    /// Build a query from raw request parameters
    ///
    /// Dates are validated strictly; an unusable sort key falls back to the
    /// default ordering.
    pub fn from_params(
        from: Option<&str>,
        to: Option<&str>,
        preset: Option<&str>,
        sort: Option<&str>,
    ) -> crate::error::Result<Self> {
        Ok(Self {
            range: RangeSpec::from_params(from, to, preset)?,
            sort: ReportSort::parse_or_default(sort),
        })
    }
}
