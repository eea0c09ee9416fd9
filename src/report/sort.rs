use crate::core::ArchiveRecord;
use crate::error::{QueueError, Result};
use std::fmt;

/// Field a report can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ArchivedAt,
    TicketNumber,
    DisplayName,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "archivedAt" | "archived_at" => Some(Self::ArchivedAt),
            "ticketNumber" | "ticket_number" => Some(Self::TicketNumber),
            "displayName" | "display_name" => Some(Self::DisplayName),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::ArchivedAt => "archivedAt",
            Self::TicketNumber => "ticketNumber",
            Self::DisplayName => "displayName",
        }
    }
}

/// Report ordering, written `field` or `-field` for descending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for ReportSort {
    /// Most recently archived first
    fn default() -> Self {
        Self {
            field: SortField::ArchivedAt,
            descending: true,
        }
    }
}

impl ReportSort {
    /// Parse a sort key strictly
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (descending, name) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let field = SortField::parse(name).ok_or_else(|| {
            QueueError::validation(format!(
                "Invalid sort key: {input}. Must be one of: archivedAt, ticketNumber, displayName"
            ))
        })?;
        Ok(Self { field, descending })
    }

    /// Parse a sort key, using the default for absent or unknown keys
    pub fn parse_or_default(input: Option<&str>) -> Self {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|e| {
                tracing::warn!("{e}; falling back to {}", Self::default());
                Self::default()
            }),
        }
    }

    /// Sort records in place
    pub fn apply(&self, records: &mut [ArchiveRecord]) {
        records.sort_by(|a, b| {
            let ordering = match self.field {
                SortField::ArchivedAt => a.archived_at.cmp(&b.archived_at),
                SortField::TicketNumber => a
                    .ticket_number
                    .cmp(&b.ticket_number)
                    .then_with(|| a.archived_at.cmp(&b.archived_at)),
                SortField::DisplayName => a
                    .display_name
                    .to_lowercase()
                    .cmp(&b.display_name.to_lowercase())
                    .then_with(|| a.archived_at.cmp(&b.archived_at)),
            };

            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

impl fmt::Display for ReportSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-")?;
        }
        write!(f, "{}", self.field.name())
    }
}
