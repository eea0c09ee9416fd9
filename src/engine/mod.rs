//! Queue management engine
//!
//! [`QueueEngine`] is the single entry point for every queue operation. It
//! owns a store and turns each request into the store's atomic primitives:
//!
//! - joining reserves a number through [`SequenceAllocator`] and inserts a
//!   `waiting` entry
//! - staff actions move entries through the lifecycle with conditional writes
//! - completion archives the entry and removes it in one store call
//! - listing and joining first run the lazy daily reset
//!
//! The engine holds no mutable state of its own, so one instance can be shared
//! between threads.

pub mod clock;
pub mod lifecycle;
mod reset;
mod sequence;

pub use clock::{Clock, ManualClock, SystemClock};
pub use reset::{ResetController, ResetOutcome};
pub use sequence::SequenceAllocator;

use crate::auth::Caller;
use crate::config::{NoShowPolicy, QueueConfig};
use crate::core::update::{normalize_text, validate_age, validate_display_name};
use crate::core::{ArchiveRecord, EntryId, EntryUpdate, PriorityClass, QueueEntry, Status, TicketNumber};
use crate::error::{QueueError, Result};
use crate::events::QueueEvents;
use crate::report::{RangeSpec, ReportQuery, ReportSummary};
use crate::storage::QueueStore;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Details a visitor gives when taking a ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(alias = "name", alias = "display_name")]
    pub display_name: String,
    pub age: Option<u16>,
    pub notes: Option<String>,
    #[serde(alias = "priority", alias = "priority_class")]
    pub priority_class: PriorityClass,
    #[serde(alias = "service", alias = "selected_service")]
    pub selected_service: Option<String>,
}

impl JoinRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn priority(mut self, priority_class: PriorityClass) -> Self {
        self.priority_class = priority_class;
        self
    }

    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.selected_service = Some(service.into());
        self
    }
}

/// The queue management engine
pub struct QueueEngine<S> {
    store: S,
    config: QueueConfig,
    offset: FixedOffset,
    clock: Arc<dyn Clock>,
    events: QueueEvents,
    allocator: SequenceAllocator,
    reset: ResetController,
}

impl<S> std::fmt::Debug for QueueEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEngine")
            .field("config", &self.config)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl<S: QueueStore> QueueEngine<S> {
    /// Create an engine over `store`
    pub fn new(store: S, config: QueueConfig) -> Result<Self> {
        config.validate()?;
        let offset = config.offset()?;
        Ok(Self {
            allocator: SequenceAllocator::new(
                config.ticket_prefix.clone(),
                config.number_width,
                config.allocation_attempts,
            ),
            reset: ResetController::new(offset),
            store,
            config,
            offset,
            clock: Arc::new(SystemClock),
            events: QueueEvents::new(),
        })
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Publish through an existing event channel
    #[must_use]
    pub fn with_events(mut self, events: QueueEvents) -> Self {
        self.events = events;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub const fn events(&self) -> &QueueEvents {
        &self.events
    }

    /// Offset that defines the operating day
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current operating day
    pub fn today(&self) -> NaiveDate {
        clock::operating_day(self.clock.now(), self.offset)
    }

    /// Reset the active queue if the operating day has changed
    pub fn ensure_current_day(&self) -> Result<ResetOutcome> {
        let today = self.today();
        let outcome = self.reset.ensure_current_day(&self.store, today)?;
        if let ResetOutcome::Reset { removed } = outcome {
            self.events.day_reset(today, removed);
        }
        Ok(outcome)
    }

    /// Take a ticket
    pub fn join(&self, request: JoinRequest) -> Result<QueueEntry> {
        let display_name =
            validate_display_name(&request.display_name, self.config.max_name_length)?;
        let age = request.age.map(validate_age).transpose()?;

        self.ensure_current_day()?;
        let now = self.clock.now();
        let today = clock::operating_day(now, self.offset);
        let ticket_number = self.allocator.allocate(&self.store, today, self.offset)?;

        let mut entry = QueueEntry::new(ticket_number, display_name, now);
        entry.age = age;
        entry.notes = normalize_text(request.notes);
        entry.priority_class = request.priority_class;
        entry.selected_service = normalize_text(request.selected_service);

        self.store.insert_entry(&entry)?;
        self.events.joined(&entry);
        Ok(entry)
    }

    /// Active entries in creation order, after the daily reset check
    pub fn list_active(&self) -> Result<Vec<QueueEntry>> {
        self.ensure_current_day()?;
        let entries = self.store.load_entries()?;
        tracing::debug!(count = entries.len(), "Listed active queue");
        Ok(entries)
    }

    /// Active entries in the order the desk should call them
    pub fn list_serving_order(&self) -> Result<Vec<QueueEntry>> {
        let mut entries = self.list_active()?;
        lifecycle::serving_order(&mut entries);
        Ok(entries)
    }

    /// Resolve an entry by id, unique id prefix or ticket number
    pub fn find_entry(&self, reference: &str) -> Result<QueueEntry> {
        let reference = reference.trim();
        let not_found = || QueueError::EntryNotFound {
            id: reference.to_string(),
        };

        if let Ok(id) = EntryId::parse_str(reference) {
            return self.store.load_entry(&id);
        }

        let entries = self.store.load_entries()?;

        if let Ok(ticket) = TicketNumber::parse(&reference.to_uppercase()) {
            // Zero padding is not significant: A-7 finds A-007.
            return entries
                .into_iter()
                .filter(|e| {
                    e.ticket_number.prefix() == ticket.prefix()
                        && e.ticket_number.index() == ticket.index()
                })
                .max_by_key(|e| e.created_at)
                .ok_or_else(not_found);
        }

        if reference.len() >= 4 {
            let mut matches = entries
                .into_iter()
                .filter(|e| e.id.to_string().starts_with(&reference.to_lowercase()));
            if let Some(entry) = matches.next() {
                if matches.next().is_some() {
                    return Err(QueueError::validation(format!(
                        "Id prefix '{reference}' matches more than one entry"
                    )));
                }
                return Ok(entry);
            }
        }

        Err(not_found())
    }

    /// Apply an allow-listed partial update
    pub fn update_entry(
        &self,
        caller: &Caller,
        id: &EntryId,
        update: &EntryUpdate,
    ) -> Result<QueueEntry> {
        caller.require_staff("update")?;
        if update.is_empty() {
            return Err(QueueError::validation("Update contains no fields"));
        }

        let current = self.store.load_entry(id)?;
        lifecycle::check_editable(&current)?;

        let mut updated = current.clone();
        update.apply(&mut updated);
        if !self.store.replace_entry(&current, &updated)? {
            return Err(self.lost_race(&current, None));
        }

        tracing::debug!(caller = caller.label(), "Entry updated");
        self.events.updated(&updated, update.field_names());
        Ok(updated)
    }

    /// Call a waiting visitor to the desk
    pub fn advance_to_serving(&self, caller: &Caller, id: &EntryId) -> Result<QueueEntry> {
        caller.require_staff("serve")?;
        let current = self.store.load_entry(id)?;
        lifecycle::check_transition(&current, Status::Serving)?;

        let mut serving = current.clone();
        serving.status = Status::Serving;
        serving.served_at = Some(self.clock.now());
        if !self.store.replace_entry(&current, &serving)? {
            return Err(self.lost_race(&current, Some(Status::Serving)));
        }

        self.events.status_changed(&serving, current.status);
        Ok(serving)
    }

    /// Finish serving a visitor and move the ticket to the archive
    ///
    /// An entry left in `done` by an interrupted completion is picked up again
    /// here; the archive never receives a second record for it.
    pub fn complete_serving(&self, caller: &Caller, id: &EntryId) -> Result<ArchiveRecord> {
        caller.require_staff("complete")?;
        let current = self.store.load_entry(id)?;

        let done = match current.status {
            Status::Serving => {
                let mut done = current.clone();
                done.status = Status::Done;
                if !self.store.replace_entry(&current, &done)? {
                    return Err(self.concurrent_write(&current));
                }
                self.events.status_changed(&done, current.status);
                done
            },
            Status::Done => {
                tracing::warn!(ticket = %current.ticket_number, "Resuming interrupted completion");
                current
            },
            from => {
                return Err(QueueError::InvalidTransition {
                    ticket: current.ticket_number.to_string(),
                    from,
                    to: Status::Done,
                });
            },
        };

        let record = ArchiveRecord::from_entry(&done, self.clock.now());
        let stored = self
            .store
            .archive_entry(&done, &record)?
            .ok_or_else(|| self.concurrent_write(&done))?;

        self.events.completed(&stored);
        Ok(stored)
    }

    /// Mark a visitor who did not answer the call
    pub fn mark_no_show(&self, caller: &Caller, id: &EntryId) -> Result<QueueEntry> {
        caller.require_staff("no-show")?;
        let current = self.store.load_entry(id)?;
        lifecycle::check_transition(&current, Status::NoShow)?;

        let mut no_show = current.clone();
        no_show.status = Status::NoShow;
        if !self.store.replace_entry(&current, &no_show)? {
            return Err(self.lost_race(&current, Some(Status::NoShow)));
        }
        self.events.status_changed(&no_show, current.status);

        if self.config.no_show_policy == NoShowPolicy::Remove {
            self.store.delete_entry(id)?;
            self.events.deleted(&no_show);
        }
        Ok(no_show)
    }

    /// Remove an active entry without archiving it
    pub fn delete_entry(&self, caller: &Caller, id: &EntryId) -> Result<QueueEntry> {
        caller.require_staff("delete")?;
        let entry = self.store.load_entry(id)?;
        self.store.delete_entry(id)?;
        self.events.deleted(&entry);
        Ok(entry)
    }

    /// Remove every active entry; the archive and the day's numbering stay
    pub fn clear_queue(&self, caller: &Caller) -> Result<usize> {
        caller.require_staff("clear")?;
        let removed = self.store.clear_entries()?;
        tracing::info!(caller = caller.label(), removed, "Cleared active queue");
        self.events.cleared(removed);
        Ok(removed)
    }

    /// Archived tickets in a date range, sorted
    pub fn reports(&self, query: &ReportQuery) -> Result<Vec<ArchiveRecord>> {
        let (start, end) = query.range.interval(self.today(), self.offset)?;
        let mut records = self.store.load_archive_between(start, end)?;
        query.sort.apply(&mut records);
        tracing::debug!(range = %query.range, sort = %query.sort, count = records.len(), "Built report");
        Ok(records)
    }

    /// Aggregate figures for a date range
    pub fn report_summary(&self, range: &RangeSpec) -> Result<ReportSummary> {
        let today = self.today();
        let (from, to) = range.resolve(today)?;
        let (start, end) = range.interval(today, self.offset)?;
        let records = self.store.load_archive_between(start, end)?;
        Ok(ReportSummary::from_records(from, to, &records))
    }

    /// Explain a failed conditional write
    ///
    /// If the entry has moved somewhere the requested transition cannot start
    /// from, that is reported as a conflict; otherwise as a concurrency error.
    fn lost_race(&self, expected: &QueueEntry, next: Option<Status>) -> QueueError {
        match self.store.load_entry(&expected.id) {
            Err(e) => e,
            Ok(latest) => {
                let blocked = match next {
                    Some(next) => lifecycle::check_transition(&latest, next).err(),
                    None => lifecycle::check_editable(&latest).err(),
                };
                blocked.unwrap_or_else(|| Self::concurrency(expected))
            },
        }
    }

    /// Another writer got there first: not found if it removed the entry
    fn concurrent_write(&self, expected: &QueueEntry) -> QueueError {
        match self.store.load_entry(&expected.id) {
            Err(e) => e,
            Ok(_) => Self::concurrency(expected),
        }
    }

    fn concurrency(entry: &QueueEntry) -> QueueError {
        QueueError::Concurrency {
            resource: format!("ticket {}", entry.ticket_number),
            attempts: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::QueueConfig;
    use crate::core::ArchiveRecordBuilder;
    use crate::storage::{ArchiveRepository, DayRepository, EntryRepository, MemoryStorage};
    use chrono::{Duration, TimeZone};

    fn config() -> QueueConfig {
        QueueConfig {
            utc_offset_minutes: Some(0),
            ..QueueConfig::default()
        }
    }

    fn engine_at(now: DateTime<Utc>) -> (QueueEngine<MemoryStorage>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let engine = QueueEngine::new(MemoryStorage::new(), config())
            .unwrap()
            .with_clock(clock.clone());
        (engine, clock)
    }

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap()
    }

    fn desk() -> Caller {
        Caller::staff("desk")
    }

    #[test]
    fn test_round_trip() {
        let (engine, clock) = engine_at(morning());

        let ana = engine.join(JoinRequest::new("Ana")).unwrap();
        let bo = engine.join(JoinRequest::new("Bo")).unwrap();
        assert_eq!(ana.ticket_number.to_string(), "A-001");
        assert_eq!(bo.ticket_number.to_string(), "A-002");

        clock.advance(Duration::minutes(5));
        let serving = engine.advance_to_serving(&desk(), &ana.id).unwrap();
        assert_eq!(serving.served_at, Some(morning() + Duration::minutes(5)));

        clock.advance(Duration::minutes(10));
        let record = engine.complete_serving(&desk(), &ana.id).unwrap();
        assert_eq!(record.ticket_number.to_string(), "A-001");
        assert_eq!(record.display_name, "Ana");

        let active = engine.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].ticket_number.to_string(), "A-002");

        let report = engine.reports(&ReportQuery::default()).unwrap();
        assert_eq!(report, vec![record]);
    }

    #[test]
    fn test_join_validates_input() {
        let (engine, _) = engine_at(morning());
        assert!(matches!(
            engine.join(JoinRequest::new("   ")),
            Err(QueueError::Validation(_))
        ));

        let mut request = JoinRequest::new("Ana");
        request.age = Some(200);
        assert!(engine.join(request).is_err());
        assert!(engine.store().load_sequence().unwrap().is_none());
    }

    #[test]
    fn test_join_request_rejects_unknown_fields() {
        let request: JoinRequest =
            serde_json::from_str(r#"{"name": "Ana", "priority": "priority", "service": "Lab"}"#)
                .unwrap();
        assert_eq!(request.display_name, "Ana");
        assert_eq!(request.priority_class, PriorityClass::Priority);

        // A misspelled key must not silently become a regular ticket
        let misspelled =
            serde_json::from_str::<JoinRequest>(r#"{"name": "Ana", "priorty": "priority"}"#);
        assert!(misspelled.is_err());
    }

    #[test]
    fn test_join_normalizes_optional_text() {
        let (engine, _) = engine_at(morning());
        let mut request = JoinRequest::new("  Ana  ").service("  ").priority(PriorityClass::Priority);
        request.notes = Some(" needs wheelchair ".into());

        let entry = engine.join(request).unwrap();
        assert_eq!(entry.display_name, "Ana");
        assert_eq!(entry.selected_service, None);
        assert_eq!(entry.notes.as_deref(), Some("needs wheelchair"));
        assert_eq!(entry.priority_class, PriorityClass::Priority);
        assert_eq!(entry.status, Status::Waiting);
    }

    #[test]
    fn test_complete_waiting_entry_is_conflict() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();

        let err = engine.complete_serving(&desk(), &entry.id).unwrap_err();
        assert!(matches!(err, QueueError::InvalidTransition { .. }));
        assert_eq!(err.status_code(), 409);
        assert!(engine.store().load_archive().unwrap().is_empty());
    }

    #[test]
    fn test_complete_twice_archives_once() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        engine.advance_to_serving(&desk(), &entry.id).unwrap();

        engine.complete_serving(&desk(), &entry.id).unwrap();
        let err = engine.complete_serving(&desk(), &entry.id).unwrap_err();
        assert!(matches!(err, QueueError::EntryNotFound { .. }));
        assert_eq!(engine.store().load_archive().unwrap().len(), 1);
    }

    #[test]
    fn test_interrupted_completion_is_resumed() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        let serving = engine.advance_to_serving(&desk(), &entry.id).unwrap();

        // Status flipped to done but the archive step never ran.
        let mut done = serving.clone();
        done.status = Status::Done;
        assert!(engine.store().replace_entry(&serving, &done).unwrap());

        let record = engine.complete_serving(&desk(), &entry.id).unwrap();
        assert_eq!(record.entry_id, entry.id);
        assert!(engine.list_active().unwrap().is_empty());
        assert_eq!(engine.store().load_archive().unwrap().len(), 1);
    }

    #[test]
    fn test_advance_requires_waiting() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        engine.advance_to_serving(&desk(), &entry.id).unwrap();

        assert!(matches!(
            engine.advance_to_serving(&desk(), &entry.id),
            Err(QueueError::InvalidTransition {
                from: Status::Serving,
                ..
            })
        ));
    }

    #[test]
    fn test_stale_copy_loses_with_conflict() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        engine.advance_to_serving(&desk(), &entry.id).unwrap();

        // A second desk acting on the waiting copy it read earlier.
        let err = engine.lost_race(&entry, Some(Status::Serving));
        assert!(matches!(err, QueueError::InvalidTransition { .. }));
    }

    #[test]
    fn test_no_show_retained_by_default() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();

        let marked = engine.mark_no_show(&desk(), &entry.id).unwrap();
        assert_eq!(marked.status, Status::NoShow);
        assert_eq!(engine.list_active().unwrap()[0].status, Status::NoShow);
        assert!(engine.store().load_archive().unwrap().is_empty());

        let update = EntryUpdate {
            notes: Some(Some("came back".into())),
            ..EntryUpdate::default()
        };
        assert!(matches!(
            engine.update_entry(&desk(), &entry.id, &update),
            Err(QueueError::EntryClosed { .. })
        ));
        assert!(engine.advance_to_serving(&desk(), &entry.id).is_err());
    }

    #[test]
    fn test_no_show_remove_policy() {
        let clock = Arc::new(ManualClock::new(morning()));
        let engine = QueueEngine::new(
            MemoryStorage::new(),
            QueueConfig {
                no_show_policy: NoShowPolicy::Remove,
                ..config()
            },
        )
        .unwrap()
        .with_clock(clock);

        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        engine.advance_to_serving(&desk(), &entry.id).unwrap();
        engine.mark_no_show(&desk(), &entry.id).unwrap();
        assert!(engine.list_active().unwrap().is_empty());
        assert!(engine.store().load_archive().unwrap().is_empty());
    }

    #[test]
    fn test_update_entry() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();

        let update = EntryUpdate {
            display_name: Some("Ana Reyes".into()),
            priority_class: Some(PriorityClass::Priority),
            ..EntryUpdate::default()
        };
        let updated = engine.update_entry(&desk(), &entry.id, &update).unwrap();
        assert_eq!(updated.display_name, "Ana Reyes");
        assert_eq!(updated.priority_class, PriorityClass::Priority);
        assert_eq!(updated.ticket_number, entry.ticket_number);
        assert_eq!(engine.store().load_entry(&entry.id).unwrap(), updated);

        let missing = EntryId::new();
        assert!(matches!(
            engine.update_entry(&desk(), &missing, &update),
            Err(QueueError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_public_callers_cannot_operate() {
        let (engine, _) = engine_at(morning());
        let entry = engine.join(JoinRequest::new("Ana")).unwrap();
        let public = Caller::public();

        for result in [
            engine.advance_to_serving(&public, &entry.id).map(|_| ()),
            engine.mark_no_show(&public, &entry.id).map(|_| ()),
            engine.delete_entry(&public, &entry.id).map(|_| ()),
            engine.clear_queue(&public).map(|_| ()),
        ] {
            assert_eq!(result.unwrap_err().status_code(), 403);
        }
        assert_eq!(engine.list_active().unwrap()[0].status, Status::Waiting);

        let owner = Caller::with_role(Some("Dr. Cruz".into()), Role::Owner);
        assert!(engine.advance_to_serving(&owner, &entry.id).is_ok());
    }

    #[test]
    fn test_delete_and_clear() {
        let (engine, _) = engine_at(morning());
        let ana = engine.join(JoinRequest::new("Ana")).unwrap();
        engine.join(JoinRequest::new("Bo")).unwrap();
        engine.join(JoinRequest::new("Cy")).unwrap();

        engine.delete_entry(&desk(), &ana.id).unwrap();
        assert!(engine.delete_entry(&desk(), &ana.id).is_err());
        assert_eq!(engine.clear_queue(&desk()).unwrap(), 2);

        // Clearing does not recycle today's numbers.
        let next = engine.join(JoinRequest::new("Dee")).unwrap();
        assert_eq!(next.ticket_number.to_string(), "A-004");
    }

    #[test]
    fn test_new_day_resets_queue_and_numbering() {
        let (engine, clock) = engine_at(morning());
        engine.join(JoinRequest::new("Ana")).unwrap();
        engine.join(JoinRequest::new("Bo")).unwrap();

        clock.advance(Duration::days(1));
        assert!(engine.list_active().unwrap().is_empty());
        assert_eq!(
            engine.store().load_reset_log().unwrap().unwrap().last_reset_date,
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );

        let first = engine.join(JoinRequest::new("Cy")).unwrap();
        assert_eq!(first.ticket_number.to_string(), "A-001");
        assert_eq!(engine.list_active().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_publishes_event() {
        let (engine, clock) = engine_at(morning());
        engine.join(JoinRequest::new("Ana")).unwrap();
        let mut rx = engine.events().subscribe();

        clock.advance(Duration::days(1));
        engine.list_active().unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            crate::events::QueueEvent::DayReset {
                day: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
                removed: 1,
            }
        );
    }

    #[test]
    fn test_find_entry_by_ticket_or_id() {
        let (engine, _) = engine_at(morning());
        let ana = engine.join(JoinRequest::new("Ana")).unwrap();

        assert_eq!(engine.find_entry("A-001").unwrap().id, ana.id);
        assert_eq!(engine.find_entry("a-1").unwrap().id, ana.id);
        assert_eq!(engine.find_entry(&ana.id.to_string()).unwrap().id, ana.id);
        assert_eq!(engine.find_entry(&ana.id.short()).unwrap().id, ana.id);
        assert!(matches!(
            engine.find_entry("A-002"),
            Err(QueueError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_reports_filter_by_day_and_sort() {
        let (engine, _) = engine_at(morning());
        let archive_at = |index: u32, name: &str, at: DateTime<Utc>| {
            ArchiveRecordBuilder::new()
                .ticket_number(TicketNumber::new("A", index, 3))
                .display_name(name)
                .created_at(at - Duration::minutes(30))
                .archived_at(at)
                .build()
        };
        let yesterday = archive_at(9, "Old", morning() - Duration::days(1));
        let early = archive_at(1, "Ana", morning() + Duration::minutes(5));
        let late = archive_at(2, "Bo", morning() + Duration::minutes(50));
        for record in [&yesterday, &early, &late] {
            let entry = crate::core::QueueEntryBuilder::new()
                .id(record.entry_id)
                .status(Status::Done)
                .build();
            engine.store().insert_entry(&entry).unwrap();
            engine.store().archive_entry(&entry, record).unwrap();
        }

        let today = engine.reports(&ReportQuery::default()).unwrap();
        assert_eq!(today, vec![late.clone(), early.clone()]);

        let query = ReportQuery::from_params(
            Some("2024-03-04"),
            Some("2024-03-05"),
            None,
            Some("ticketNumber"),
        )
        .unwrap();
        assert_eq!(engine.reports(&query).unwrap(), vec![early, late, yesterday]);

        let summary = engine
            .report_summary(&RangeSpec::from_params(None, None, Some("yesterday")).unwrap())
            .unwrap();
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn test_reports_reject_bad_dates() {
        let (engine, _) = engine_at(morning());
        let range = RangeSpec::Explicit {
            from: NaiveDate::from_ymd_opt(2024, 3, 6),
            to: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert!(matches!(
            engine.reports(&ReportQuery::new(range, Default::default())),
            Err(QueueError::Validation(_))
        ));
    }
}
