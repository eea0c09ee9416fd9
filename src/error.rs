//! Error types for walkin-queue
//!
//! Every failure is per-request. [`QueueError::kind`] groups the variants into
//! the categories callers act on (validation, not found, conflict, concurrency,
//! forbidden, internal) and [`QueueError::status_code`] gives the matching
//! HTTP-equivalent code.

use crate::core::Status;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, QueueError>;

/// Coarse error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Concurrency,
    Forbidden,
    Internal,
}

/// Main error type for queue operations
#[derive(Error, Debug)]
pub enum QueueError {
    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A date filter could not be parsed
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// An update payload named a field outside the allow-list
    #[error("Field '{field}' cannot be updated")]
    UnknownField { field: String },

    /// No active entry matches the reference
    #[error("Queue entry not found: {id}")]
    EntryNotFound { id: String },

    /// A lifecycle transition is not allowed from the current status
    #[error("Ticket {ticket} cannot move from {from} to {to}")]
    InvalidTransition {
        ticket: String,
        from: Status,
        to: Status,
    },

    /// The entry reached a terminal status and can no longer be edited
    #[error("Ticket {ticket} is {status} and can no longer be modified")]
    EntryClosed { ticket: String, status: Status },

    /// A compare-and-swap kept losing against concurrent writers
    #[error("Concurrent update on {resource}; gave up after {attempts} attempts")]
    Concurrency { resource: String, attempts: u32 },

    /// The store lock could not be acquired in time
    #[error("Timed out waiting for store lock at {path}")]
    LockTimeout { path: String },

    /// The caller's role does not allow the operation
    #[error("Operation '{operation}' requires a staff role (caller is {role})")]
    PermissionDenied { operation: String, role: String },

    /// No queue data directory was found
    #[error("Queue not initialized")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Custom(String),
}

impl QueueError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a custom error
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidDate { .. } | Self::UnknownField { .. } => {
                ErrorKind::Validation
            },
            Self::EntryNotFound { .. } | Self::NotInitialized => ErrorKind::NotFound,
            Self::InvalidTransition { .. } | Self::EntryClosed { .. } => ErrorKind::Conflict,
            Self::Concurrency { .. } | Self::LockTimeout { .. } => ErrorKind::Concurrency,
            Self::PermissionDenied { .. } => ErrorKind::Forbidden,
            Self::Io(_)
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::Csv(_)
            | Self::Config(_)
            | Self::Custom(_) => ErrorKind::Internal,
        }
    }

    /// HTTP-equivalent status code
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict | ErrorKind::Concurrency => 409,
            ErrorKind::Forbidden => 403,
            ErrorKind::Internal => 500,
        }
    }

    /// Whether retrying the same request may succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Concurrency)
    }

    /// Whether the error came from configuration loading
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Message suitable for showing to an operator
    pub fn user_message(&self) -> String {
        match self {
            Self::NotInitialized => {
                "Queue not initialized. Run 'walkin-queue init' first.".to_string()
            },
            Self::Io(e) => format!("File operation failed: {e}"),
            _ => self.to_string(),
        }
    }

    /// Hints for resolving the error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotInitialized => vec![
                "Run 'walkin-queue init' to create the queue data directory".to_string(),
                "Or pass --data-dir pointing at an existing queue".to_string(),
            ],
            Self::EntryNotFound { .. } => vec![
                "Run 'walkin-queue list' to see active tickets".to_string(),
                "Completed tickets are in 'walkin-queue report'".to_string(),
            ],
            Self::InvalidTransition { to: Status::Done, .. } => {
                vec!["Call the ticket with 'walkin-queue serve' before completing it".to_string()]
            },
            Self::InvalidDate { .. } => {
                vec!["Use dates like 2024-01-15 or a preset such as 'today'".to_string()]
            },
            Self::UnknownField { .. } => vec![
                "Updatable fields: name, age, notes, priority, service".to_string(),
            ],
            Self::Concurrency { .. } | Self::LockTimeout { .. } => {
                vec!["Another request was updating the queue; try again".to_string()]
            },
            Self::PermissionDenied { .. } => {
                vec!["Run the command with --role staff".to_string()]
            },
            _ => vec![],
        }
    }
}
