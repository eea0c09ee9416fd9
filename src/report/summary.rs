use crate::core::{ArchiveRecord, PriorityClass};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for tickets that never picked a service
pub const UNSPECIFIED_SERVICE: &str = "unspecified";

/// Aggregate figures over a set of archived tickets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: usize,
    pub priority: usize,
    pub regular: usize,
    pub by_service: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_wait_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_service_minutes: Option<f64>,
}

impl ReportSummary {
    pub fn from_records(from: NaiveDate, to: NaiveDate, records: &[ArchiveRecord]) -> Self {
        let priority = records
            .iter()
            .filter(|r| r.priority_class == PriorityClass::Priority)
            .count();

        let mut by_service = BTreeMap::new();
        for record in records {
            let service = record
                .selected_service
                .clone()
                .unwrap_or_else(|| UNSPECIFIED_SERVICE.to_string());
            *by_service.entry(service).or_insert(0) += 1;
        }

        Self {
            from,
            to,
            total: records.len(),
            priority,
            regular: records.len() - priority,
            by_service,
            average_wait_minutes: average(records.iter().filter_map(ArchiveRecord::wait_minutes)),
            average_service_minutes: average(
                records.iter().filter_map(ArchiveRecord::service_minutes),
            ),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn average(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0_i64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArchiveRecordBuilder;
    use chrono::{Duration, Utc};

    #[test]
    fn test_summary_counts_and_averages() {
        let start = Utc::now();
        let records = vec![
            ArchiveRecordBuilder::new()
                .priority_class(PriorityClass::Priority)
                .selected_service("Ultrasound")
                .created_at(start)
                .served_at(start + Duration::minutes(10))
                .archived_at(start + Duration::minutes(30))
                .build(),
            ArchiveRecordBuilder::new()
                .selected_service("Ultrasound")
                .created_at(start)
                .served_at(start + Duration::minutes(20))
                .archived_at(start + Duration::minutes(30))
                .build(),
            ArchiveRecordBuilder::new().created_at(start).archived_at(start).build(),
        ];
        let day = start.date_naive();

        let summary = ReportSummary::from_records(day, day, &records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.priority, 1);
        assert_eq!(summary.regular, 2);
        assert_eq!(summary.by_service["Ultrasound"], 2);
        assert_eq!(summary.by_service[UNSPECIFIED_SERVICE], 1);
        assert_eq!(summary.average_wait_minutes, Some(15.0));
        assert_eq!(summary.average_service_minutes, Some(15.0));
    }

    #[test]
    fn test_empty_summary() {
        let day = Utc::now().date_naive();
        let summary = ReportSummary::from_records(day, day, &[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_service.is_empty());
        assert_eq!(summary.average_wait_minutes, None);
    }
}
