use super::{EntryId, PriorityClass, QueueEntry, TicketNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a served ticket
///
/// `entry_id` is the idempotency key: the archive never holds two records for
/// the same entry, so an interrupted completion can be retried safely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub entry_id: EntryId,
    pub ticket_number: TicketNumber,
    pub display_name: String,
    pub priority_class: PriorityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_service: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<DateTime<Utc>>,
    pub archived_at: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Snapshot an entry at completion time
    pub fn from_entry(entry: &QueueEntry, archived_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: entry.id,
            ticket_number: entry.ticket_number.clone(),
            display_name: entry.display_name.clone(),
            priority_class: entry.priority_class,
            selected_service: entry.selected_service.clone(),
            created_at: entry.created_at,
            served_at: entry.served_at,
            archived_at,
        }
    }

    /// Minutes between joining and being called
    pub fn wait_minutes(&self) -> Option<i64> {
        self.served_at
            .map(|served| (served - self.created_at).num_minutes().max(0))
    }

    /// Minutes between being called and completion
    pub fn service_minutes(&self) -> Option<i64> {
        self.served_at
            .map(|served| (self.archived_at - served).num_minutes().max(0))
    }
}
