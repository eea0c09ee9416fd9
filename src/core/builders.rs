use super::{ArchiveRecord, EntryId, PriorityClass, QueueEntry, Status, TicketNumber};
use chrono::{DateTime, Utc};

/// Builder for creating `QueueEntry` instances
#[derive(Default)]
pub struct QueueEntryBuilder {
    id: Option<EntryId>,
    ticket_number: Option<TicketNumber>,
    display_name: Option<String>,
    age: Option<u16>,
    notes: Option<String>,
    priority_class: Option<PriorityClass>,
    selected_service: Option<String>,
    status: Option<Status>,
    created_at: Option<DateTime<Utc>>,
    served_at: Option<DateTime<Utc>>,
}

impl QueueEntryBuilder {
    /// Create a new entry builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry ID
    #[must_use]
    pub const fn id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the ticket number
    #[must_use]
    pub fn ticket_number(mut self, ticket_number: TicketNumber) -> Self {
        self.ticket_number = Some(ticket_number);
        self
    }

    /// Set the display name
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub const fn age(mut self, age: Option<u16>) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Set the priority class
    #[must_use]
    pub const fn priority_class(mut self, priority_class: PriorityClass) -> Self {
        self.priority_class = Some(priority_class);
        self
    }

    #[must_use]
    pub fn selected_service(mut self, selected_service: Option<String>) -> Self {
        self.selected_service = selected_service;
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `served_at` timestamp
    #[must_use]
    pub const fn served_at(mut self, served_at: DateTime<Utc>) -> Self {
        self.served_at = Some(served_at);
        self
    }

    /// Build the entry
    pub fn build(self) -> QueueEntry {
        QueueEntry {
            id: self.id.unwrap_or_default(),
            ticket_number: self
                .ticket_number
                .unwrap_or_else(|| TicketNumber::new("A", 1, 3)),
            display_name: self.display_name.unwrap_or_default(),
            age: self.age,
            notes: self.notes,
            priority_class: self.priority_class.unwrap_or_default(),
            selected_service: self.selected_service,
            status: self.status.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
            served_at: self.served_at,
        }
    }
}

/// Builder for creating `ArchiveRecord` instances
#[derive(Default)]
pub struct ArchiveRecordBuilder {
    entry_id: Option<EntryId>,
    ticket_number: Option<TicketNumber>,
    display_name: Option<String>,
    priority_class: Option<PriorityClass>,
    selected_service: Option<String>,
    created_at: Option<DateTime<Utc>>,
    served_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
}

impl ArchiveRecordBuilder {
    /// Create a new record builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn entry_id(mut self, entry_id: EntryId) -> Self {
        self.entry_id = Some(entry_id);
        self
    }

    /// Set the ticket number
    #[must_use]
    pub fn ticket_number(mut self, ticket_number: TicketNumber) -> Self {
        self.ticket_number = Some(ticket_number);
        self
    }

    /// Set the display name
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub const fn priority_class(mut self, priority_class: PriorityClass) -> Self {
        self.priority_class = Some(priority_class);
        self
    }

    #[must_use]
    pub fn selected_service(mut self, selected_service: impl Into<String>) -> Self {
        self.selected_service = Some(selected_service.into());
        self
    }

    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub const fn served_at(mut self, served_at: DateTime<Utc>) -> Self {
        self.served_at = Some(served_at);
        self
    }

    /// Set `archived_at` timestamp
    #[must_use]
    pub const fn archived_at(mut self, archived_at: DateTime<Utc>) -> Self {
        self.archived_at = Some(archived_at);
        self
    }

    /// Build the record
    pub fn build(self) -> ArchiveRecord {
        let archived_at = self.archived_at.unwrap_or_else(Utc::now);
        ArchiveRecord {
            entry_id: self.entry_id.unwrap_or_default(),
            ticket_number: self
                .ticket_number
                .unwrap_or_else(|| TicketNumber::new("A", 1, 3)),
            display_name: self.display_name.unwrap_or_default(),
            priority_class: self.priority_class.unwrap_or_default(),
            selected_service: self.selected_service,
            created_at: self.created_at.unwrap_or(archived_at),
            served_at: self.served_at,
            archived_at,
        }
    }
}
