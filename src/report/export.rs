use crate::core::ArchiveRecord;
use crate::error::{QueueError, Result};
use std::fmt;
use std::str::FromStr;

const CSV_HEADER: [&str; 8] = [
    "ticket_number",
    "display_name",
    "priority_class",
    "selected_service",
    "created_at",
    "served_at",
    "archived_at",
    "entry_id",
];

/// Output formats for archived records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    /// Get file extension for the format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
        }
    }

    /// Render records in this format
    pub fn render(self, records: &[ArchiveRecord]) -> Result<String> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(records)?),
            Self::Yaml => Ok(serde_yaml::to_string(records)?),
            Self::Csv => render_csv(records),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            other => Err(QueueError::validation(format!(
                "Unsupported format: {other}. Must be one of: json, yaml, csv"
            ))),
        }
    }
}

fn render_csv(records: &[ArchiveRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record([
            record.ticket_number.to_string(),
            record.display_name.clone(),
            record.priority_class.to_string(),
            record.selected_service.clone().unwrap_or_default(),
            record.created_at.to_rfc3339(),
            record.served_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            record.archived_at.to_rfc3339(),
            record.entry_id.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| QueueError::custom(format!("Failed to finish CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| QueueError::custom(format!("Invalid UTF-8 in CSV: {e}")))
}
