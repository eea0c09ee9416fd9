//! Typed partial updates for active entries
//!
//! Only a fixed allow-list of fields can change after joining. Payloads that
//! name anything else are rejected instead of being silently ignored.

use super::{PriorityClass, QueueEntry};
use crate::error::{QueueError, Result};
use serde_json::{Map, Value};

/// Fields that belong to the entry but are never writable through an update
const READ_ONLY_FIELDS: &[&str] = &[
    "id",
    "ticket_number",
    "ticketNumber",
    "status",
    "created_at",
    "createdAt",
    "served_at",
    "servedAt",
];

/// Oldest age accepted at the desk
pub const MAX_AGE: u16 = 130;

/// A validated set of field changes
///
/// For optional fields the outer `Option` says whether the field is touched and
/// the inner one carries the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub display_name: Option<String>,
    pub age: Option<Option<u16>>,
    pub notes: Option<Option<String>>,
    pub priority_class: Option<PriorityClass>,
    pub selected_service: Option<Option<String>>,
}

impl EntryUpdate {
    /// Build an update from an untyped JSON object
    pub fn from_json(fields: &Map<String, Value>, max_name_length: usize) -> Result<Self> {
        let mut update = Self::default();

        for (key, value) in fields {
            match key.as_str() {
                "name" | "display_name" | "displayName" => {
                    let name = value.as_str().ok_or_else(|| {
                        QueueError::validation("Field 'name' must be a string")
                    })?;
                    update.display_name = Some(validate_display_name(name, max_name_length)?);
                },
                "age" => update.age = Some(parse_age_value(value)?),
                "notes" => update.notes = Some(optional_text(key, value)?),
                "priority" | "priority_class" | "priorityClass" => {
                    let class = value.as_str().ok_or_else(|| {
                        QueueError::validation("Field 'priority' must be a string")
                    })?;
                    update.priority_class = Some(class.parse()?);
                },
                "service" | "selected_service" | "selectedService" => {
                    update.selected_service = Some(optional_text(key, value)?);
                },
                other if READ_ONLY_FIELDS.contains(&other) => {
                    return Err(QueueError::validation(format!(
                        "Field '{other}' is read-only; use the queue operations to change it"
                    )));
                },
                other => {
                    return Err(QueueError::UnknownField {
                        field: other.to_string(),
                    });
                },
            }
        }

        if update.is_empty() {
            return Err(QueueError::validation("Update contains no fields"));
        }

        Ok(update)
    }

    /// Build an update from `key=value` pairs as typed on a command line
    pub fn from_pairs(pairs: &[String], max_name_length: usize) -> Result<Self> {
        let mut fields = Map::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                QueueError::validation(format!("Expected key=value, got '{pair}'"))
            })?;
            let value = value.trim();
            let value = if value.is_empty() {
                Value::Null
            } else {
                Value::String(value.to_string())
            };
            fields.insert(key.trim().to_string(), value);
        }
        Self::from_json(&fields, max_name_length)
    }

    /// True if nothing would change
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.age.is_none()
            && self.notes.is_none()
            && self.priority_class.is_none()
            && self.selected_service.is_none()
    }

    /// Names of the fields this update touches
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.display_name.is_some() {
            names.push("name");
        }
        if self.age.is_some() {
            names.push("age");
        }
        if self.notes.is_some() {
            names.push("notes");
        }
        if self.priority_class.is_some() {
            names.push("priority");
        }
        if self.selected_service.is_some() {
            names.push("service");
        }
        names
    }

    /// Write the changes into an entry
    pub fn apply(&self, entry: &mut QueueEntry) {
        if let Some(name) = &self.display_name {
            entry.display_name.clone_from(name);
        }
        if let Some(age) = self.age {
            entry.age = age;
        }
        if let Some(notes) = &self.notes {
            entry.notes.clone_from(notes);
        }
        if let Some(class) = self.priority_class {
            entry.priority_class = class;
        }
        if let Some(service) = &self.selected_service {
            entry.selected_service.clone_from(service);
        }
    }
}

/// Trim and bound a display name
pub fn validate_display_name(name: &str, max_length: usize) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QueueError::validation("Name is required"));
    }
    if name.chars().count() > max_length {
        return Err(QueueError::validation(format!(
            "Name cannot exceed {max_length} characters"
        )));
    }
    Ok(name.to_string())
}

/// Bound an age
pub fn validate_age(age: u16) -> Result<u16> {
    if age > MAX_AGE {
        return Err(QueueError::validation(format!(
            "Age must be between 0 and {MAX_AGE}"
        )));
    }
    Ok(age)
}

/// Empty strings count as "not provided"
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_age_value(value: &Value) -> Result<Option<u16>> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    let age = raw
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| QueueError::validation("Field 'age' must be a whole number"))?;
    validate_age(age).map(Some)
}

fn optional_text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(normalize_text(Some(s.clone()))),
        _ => Err(QueueError::validation(format!(
            "Field '{key}' must be a string or null"
        ))),
    }
}
