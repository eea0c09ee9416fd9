//! Queue change notifications for in-process subscribers such as a display board

use crate::core::{ArchiveRecord, EntryId, QueueEntry, Status, TicketNumber};
use chrono::NaiveDate;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 100;

/// Something that changed in the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Joined {
        entry: QueueEntry,
    },
    Updated {
        entry: QueueEntry,
        fields: Vec<&'static str>,
    },
    StatusChanged {
        entry_id: EntryId,
        ticket_number: TicketNumber,
        old_status: Status,
        new_status: Status,
    },
    Completed {
        record: ArchiveRecord,
    },
    Deleted {
        entry_id: EntryId,
        ticket_number: TicketNumber,
    },
    Cleared {
        removed: usize,
    },
    DayReset {
        day: NaiveDate,
        removed: usize,
    },
}

/// Broadcast sender; sending with nobody listening is not an error
#[derive(Debug, Clone)]
pub struct QueueEvents {
    sender: broadcast::Sender<QueueEvent>,
}

impl Default for QueueEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Get an event receiver
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.sender.subscribe()
    }

    pub fn joined(&self, entry: &QueueEntry) {
        tracing::info!(ticket = %entry.ticket_number, "Joined queue");
        self.publish(QueueEvent::Joined {
            entry: entry.clone(),
        });
    }

    pub fn updated(&self, entry: &QueueEntry, fields: Vec<&'static str>) {
        tracing::info!(ticket = %entry.ticket_number, ?fields, "Entry updated");
        self.publish(QueueEvent::Updated {
            entry: entry.clone(),
            fields,
        });
    }

    pub fn status_changed(&self, entry: &QueueEntry, old_status: Status) {
        tracing::info!(
            ticket = %entry.ticket_number,
            from = %old_status,
            to = %entry.status,
            "Status changed"
        );
        self.publish(QueueEvent::StatusChanged {
            entry_id: entry.id,
            ticket_number: entry.ticket_number.clone(),
            old_status,
            new_status: entry.status,
        });
    }

    pub fn completed(&self, record: &ArchiveRecord) {
        tracing::info!(ticket = %record.ticket_number, "Ticket archived");
        self.publish(QueueEvent::Completed {
            record: record.clone(),
        });
    }

    pub fn deleted(&self, entry: &QueueEntry) {
        tracing::info!(ticket = %entry.ticket_number, "Entry deleted");
        self.publish(QueueEvent::Deleted {
            entry_id: entry.id,
            ticket_number: entry.ticket_number.clone(),
        });
    }

    pub fn cleared(&self, removed: usize) {
        tracing::info!(removed, "Queue cleared");
        self.publish(QueueEvent::Cleared { removed });
    }

    pub fn day_reset(&self, day: NaiveDate, removed: usize) {
        tracing::info!(%day, removed, "Queue reset for new day");
        self.publish(QueueEvent::DayReset { day, removed });
    }

    fn publish(&self, event: QueueEvent) {
        let _ = self.sender.send(event);
    }
}
