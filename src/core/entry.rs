use crate::error::{QueueError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

static TICKET_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9]*)-(\d+)$").expect("ticket number pattern is valid")
});

/// Store-assigned identifier of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an id from its string form
    pub fn parse_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| QueueError::validation(format!("Invalid entry id: {s}")))
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight characters, for display
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(8).collect()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing ticket number such as `A-007`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketNumber {
    prefix: String,
    index: u32,
    width: usize,
}

impl TicketNumber {
    /// Build a ticket number from its parts
    pub fn new(prefix: impl Into<String>, index: u32, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            index,
            width,
        }
    }

    /// Parse `PREFIX-NNN`
    pub fn parse(s: &str) -> Result<Self> {
        let caps = TICKET_NUMBER_PATTERN
            .captures(s.trim())
            .ok_or_else(|| QueueError::validation(format!("Invalid ticket number: {s}")))?;
        let digits = &caps[2];
        let index = digits
            .parse::<u32>()
            .map_err(|_| QueueError::validation(format!("Ticket index out of range: {s}")))?;
        Ok(Self {
            prefix: caps[1].to_string(),
            index,
            width: digits.len(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:0width$}", self.prefix, self.index, width = self.width)
    }
}

impl TryFrom<String> for TicketNumber {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TicketNumber> for String {
    fn from(value: TicketNumber) -> Self {
        value.to_string()
    }
}

impl Ord for TicketNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then(self.index.cmp(&other.index))
            .then(self.width.cmp(&other.width))
    }
}

impl PartialOrd for TicketNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lifecycle status of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Waiting,
    Serving,
    Done,
    NoShow,
}

impl Status {
    /// `done` and `no_show` accept no further transitions
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::NoShow)
    }

    /// Allowed edges of the lifecycle graph
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Serving)
                | (Self::Serving, Self::Done)
                | (Self::Waiting | Self::Serving, Self::NoShow)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Serving => "serving",
            Self::Done => "done",
            Self::NoShow => "no_show",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Status {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "waiting" => Ok(Self::Waiting),
            "serving" => Ok(Self::Serving),
            "done" => Ok(Self::Done),
            "no_show" | "noshow" => Ok(Self::NoShow),
            other => Err(QueueError::validation(format!(
                "Invalid status: {other}. Must be one of: waiting, serving, done, no_show"
            ))),
        }
    }
}

/// Triage class; presentation layers call `priority` entries first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    #[default]
    Regular,
    Priority,
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Priority => write!(f, "priority"),
        }
    }
}

impl FromStr for PriorityClass {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "priority" => Ok(Self::Priority),
            other => Err(QueueError::validation(format!(
                "Invalid priority class: {other}. Must be one of: regular, priority"
            ))),
        }
    }
}

/// An active ticket in the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub ticket_number: TicketNumber,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority_class: PriorityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_service: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Create a new waiting entry
    pub fn new(ticket_number: TicketNumber, display_name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            ticket_number,
            display_name,
            age: None,
            notes: None,
            priority_class: PriorityClass::Regular,
            selected_service: None,
            status: Status::Waiting,
            created_at,
            served_at: None,
        }
    }

    /// Minutes spent waiting, up to `served_at` or `now`
    pub fn wait_minutes(&self, now: DateTime<Utc>) -> i64 {
        let end = self.served_at.unwrap_or(now);
        (end - self.created_at).num_minutes().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_number_format_and_parse() {
        let number = TicketNumber::new("A", 7, 3);
        assert_eq!(number.to_string(), "A-007");

        let parsed = TicketNumber::parse("A-042").unwrap();
        assert_eq!(parsed.prefix(), "A");
        assert_eq!(parsed.index(), 42);
        assert_eq!(parsed.to_string(), "A-042");

        assert_eq!(TicketNumber::new("A", 1000, 3).to_string(), "A-1000");
    }

    #[test]
    fn test_ticket_number_rejects_garbage() {
        assert!(TicketNumber::parse("A042").is_err());
        assert!(TicketNumber::parse("a-042").is_err());
        assert!(TicketNumber::parse("A-").is_err());
        assert!(TicketNumber::parse("A-99999999999").is_err());
    }

    #[test]
    fn test_ticket_numbers_order_numerically() {
        let small = TicketNumber::new("A", 999, 3);
        let large = TicketNumber::new("A", 1000, 3);
        assert!(small < large);
        assert!(small.to_string() > large.to_string());
    }

    #[test]
    fn test_ticket_number_serde_as_string() {
        let number = TicketNumber::new("A", 3, 3);
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"A-003\"");
        let back: TicketNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }

    #[test]
    fn test_status_transitions() {
        assert!(Status::Waiting.can_transition_to(Status::Serving));
        assert!(Status::Serving.can_transition_to(Status::Done));
        assert!(Status::Waiting.can_transition_to(Status::NoShow));
        assert!(Status::Serving.can_transition_to(Status::NoShow));
        assert!(!Status::Waiting.can_transition_to(Status::Done));
        assert!(!Status::Done.can_transition_to(Status::Serving));
        assert!(!Status::NoShow.can_transition_to(Status::Waiting));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("no-show".parse::<Status>().unwrap(), Status::NoShow);
        assert_eq!("SERVING".parse::<Status>().unwrap(), Status::Serving);
        assert!("finished".parse::<Status>().is_err());
    }

    #[test]
    fn test_wait_minutes() {
        let created = Utc::now() - chrono::Duration::minutes(30);
        let mut entry = QueueEntry::new(TicketNumber::new("A", 1, 3), "Ana".into(), created);
        assert!(entry.wait_minutes(Utc::now()) >= 30);

        entry.served_at = Some(created + chrono::Duration::minutes(12));
        assert_eq!(entry.wait_minutes(Utc::now()), 12);
    }
}
