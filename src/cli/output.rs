//! Terminal output
//!
//! Human-readable output goes through [`OutputFormatter`]'s message helpers.
//! In `--json` mode those helpers stay quiet and commands print one JSON
//! document instead, so stdout can be piped into other tools.

use crate::core::{ArchiveRecord, PriorityClass, QueueEntry, Status};
use crate::error::Result;
use chrono::{DateTime, FixedOffset, Utc};
use colored::Colorize;
use serde::Serialize;

/// Output formatter shared by all command handlers
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    /// Create a formatter
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color || std::env::var_os("NO_COLOR").is_some() {
            colored::control::set_override(false);
        }
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{} {message}", "✓".green().bold());
        }
    }

    /// Print an informational message
    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    /// Print a warning
    pub fn warning(&self, message: &str) {
        if !self.json {
            println!("{} {message}", "!".yellow().bold());
        }
    }

    /// Print an error to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print the active queue as a table
    pub fn print_entries(&self, entries: &[QueueEntry], now: DateTime<Utc>, offset: FixedOffset) {
        if entries.is_empty() {
            self.info("The queue is empty.");
            return;
        }

        println!(
            "{:<8} {:<24} {:<9} {:<9} {:<18} {:>6}  {}",
            "TICKET".bold(),
            "NAME".bold(),
            "STATUS".bold(),
            "CLASS".bold(),
            "SERVICE".bold(),
            "WAIT".bold(),
            "JOINED".bold()
        );
        for entry in entries {
            println!(
                "{:<8} {:<24} {:<9} {:<9} {:<18} {:>5}m  {}",
                entry.ticket_number.to_string().cyan(),
                truncate(&entry.display_name, 24),
                colored_status(entry.status),
                colored_class(entry.priority_class),
                truncate(entry.selected_service.as_deref().unwrap_or("-"), 18),
                entry.wait_minutes(now),
                entry.created_at.with_timezone(&offset).format("%H:%M")
            );
        }
    }

    /// Print one entry in detail
    pub fn print_entry(&self, entry: &QueueEntry, offset: FixedOffset) {
        println!("{} {}", "Ticket:".bold(), entry.ticket_number.to_string().cyan());
        println!("{} {}", "ID:".bold(), entry.id);
        println!("{} {}", "Name:".bold(), entry.display_name);
        println!("{} {}", "Status:".bold(), colored_status(entry.status));
        println!("{} {}", "Class:".bold(), colored_class(entry.priority_class));
        if let Some(age) = entry.age {
            println!("{} {age}", "Age:".bold());
        }
        if let Some(service) = &entry.selected_service {
            println!("{} {service}", "Service:".bold());
        }
        if let Some(notes) = &entry.notes {
            println!("{} {notes}", "Notes:".bold());
        }
        println!(
            "{} {}",
            "Joined:".bold(),
            entry.created_at.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S")
        );
        if let Some(served_at) = entry.served_at {
            println!(
                "{} {}",
                "Called:".bold(),
                served_at.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    /// Print archived records as a table
    pub fn print_records(&self, records: &[ArchiveRecord], offset: FixedOffset) {
        if records.is_empty() {
            self.info("No served tickets in this range.");
            return;
        }

        println!(
            "{:<8} {:<24} {:<9} {:<18} {:>6}  {}",
            "TICKET".bold(),
            "NAME".bold(),
            "CLASS".bold(),
            "SERVICE".bold(),
            "WAIT".bold(),
            "ARCHIVED".bold()
        );
        for record in records {
            let wait = record
                .wait_minutes()
                .map_or_else(|| "-".to_string(), |m| format!("{m}m"));
            println!(
                "{:<8} {:<24} {:<9} {:<18} {:>6}  {}",
                record.ticket_number.to_string().cyan(),
                truncate(&record.display_name, 24),
                colored_class(record.priority_class),
                truncate(record.selected_service.as_deref().unwrap_or("-"), 18),
                wait,
                record.archived_at.with_timezone(&offset).format("%Y-%m-%d %H:%M")
            );
        }
    }
}

fn colored_status(status: Status) -> colored::ColoredString {
    let label = status.to_string();
    match status {
        Status::Waiting => label.normal(),
        Status::Serving => label.green(),
        Status::Done => label.blue(),
        Status::NoShow => label.red(),
    }
}

fn colored_class(class: PriorityClass) -> colored::ColoredString {
    match class {
        PriorityClass::Priority => class.to_string().magenta().bold(),
        PriorityClass::Regular => class.to_string().normal(),
    }
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
