//! Entry lifecycle guards
//!
//! ```text
//! waiting ──▶ serving ──▶ done ──▶ (archived, removed)
//!    │           │
//!    └───────────┴──▶ no_show
//! ```

use crate::core::{PriorityClass, QueueEntry, Status};
use crate::error::{QueueError, Result};

/// Fail unless `entry` may move to `next`
pub fn check_transition(entry: &QueueEntry, next: Status) -> Result<()> {
    if entry.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(QueueError::InvalidTransition {
            ticket: entry.ticket_number.to_string(),
            from: entry.status,
            to: next,
        })
    }
}

/// Fail if `entry` reached a terminal status
pub fn check_editable(entry: &QueueEntry) -> Result<()> {
    if entry.status.is_terminal() {
        Err(QueueError::EntryClosed {
            ticket: entry.ticket_number.to_string(),
            status: entry.status,
        })
    } else {
        Ok(())
    }
}

/// Order in which the desk should call people: priority class first, then
/// arrival. Only reorders the given slice.
pub fn serving_order(entries: &mut [QueueEntry]) {
    entries.sort_by(|a, b| {
        let rank = |e: &QueueEntry| match e.priority_class {
            PriorityClass::Priority => 0,
            PriorityClass::Regular => 1,
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.ticket_number.cmp(&b.ticket_number))
    });
}

/// The entry the desk should call next, if anyone is waiting
pub fn next_to_serve(entries: &[QueueEntry]) -> Option<&QueueEntry> {
    let mut waiting: Vec<&QueueEntry> = entries
        .iter()
        .filter(|e| e.status == Status::Waiting)
        .collect();
    waiting.sort_by_key(|e| {
        (
            e.priority_class != PriorityClass::Priority,
            e.created_at,
            e.ticket_number.clone(),
        )
    });
    waiting.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{QueueEntryBuilder, TicketNumber};
    use chrono::{Duration, Utc};

    fn entry(index: u32, class: PriorityClass, status: Status) -> QueueEntry {
        QueueEntryBuilder::new()
            .ticket_number(TicketNumber::new("A", index, 3))
            .priority_class(class)
            .status(status)
            .created_at(Utc::now() + Duration::seconds(i64::from(index)))
            .build()
    }

    #[test]
    fn test_transition_errors_are_conflicts() {
        let waiting = entry(1, PriorityClass::Regular, Status::Waiting);
        assert!(check_transition(&waiting, Status::Serving).is_ok());

        let err = check_transition(&waiting, Status::Done).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "Ticket A-001 cannot move from waiting to done");
    }

    #[test]
    fn test_terminal_entries_are_not_editable() {
        assert!(check_editable(&entry(1, PriorityClass::Regular, Status::Serving)).is_ok());
        assert!(matches!(
            check_editable(&entry(1, PriorityClass::Regular, Status::NoShow)),
            Err(QueueError::EntryClosed { .. })
        ));
    }

    #[test]
    fn test_serving_order_puts_priority_first() {
        let mut entries = vec![
            entry(1, PriorityClass::Regular, Status::Waiting),
            entry(2, PriorityClass::Priority, Status::Waiting),
            entry(3, PriorityClass::Regular, Status::Waiting),
            entry(4, PriorityClass::Priority, Status::Waiting),
        ];
        serving_order(&mut entries);

        let order: Vec<u32> = entries.iter().map(|e| e.ticket_number.index()).collect();
        assert_eq!(order, [2, 4, 1, 3]);
    }

    #[test]
    fn test_next_to_serve_skips_non_waiting() {
        let entries = vec![
            entry(1, PriorityClass::Priority, Status::Serving),
            entry(2, PriorityClass::Regular, Status::Waiting),
            entry(3, PriorityClass::Priority, Status::Waiting),
        ];
        assert_eq!(next_to_serve(&entries).unwrap().ticket_number.index(), 3);
        assert!(next_to_serve(&entries[..1]).is_none());
    }
}
