//! Configuration loading
//!
//! Settings are layered: built-in defaults, then `<data dir>/config.yaml` if it
//! exists, then `WALKIN_QUEUE_*` environment variables (nested keys use `__`,
//! e.g. `WALKIN_QUEUE_LOCK__RETRIES=50`).

use crate::error::{QueueError, Result};
use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File name of the optional configuration file inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// What happens to an entry marked as no-show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoShowPolicy {
    /// Keep the entry listed with status `no_show` until the day resets
    #[default]
    Retain,
    /// Delete the entry immediately
    Remove,
}

impl fmt::Display for NoShowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

impl FromStr for NoShowPolicy {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "remove" => Ok(Self::Remove),
            other => Err(QueueError::validation(format!(
                "Invalid no-show policy: {other}. Must be one of: retain, remove"
            ))),
        }
    }
}

/// Advisory lock tuning for the file store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            retries: 200,
            retry_delay_ms: 10,
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub ticket_prefix: String,
    pub number_width: usize,
    /// Offset used to decide the operating day; the host's local offset when unset
    pub utc_offset_minutes: Option<i32>,
    pub no_show_policy: NoShowPolicy,
    pub max_name_length: usize,
    pub allocation_attempts: u32,
    pub lock: LockConfig,
    pub api: ApiConfig,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            ticket_prefix: "A".to_string(),
            number_width: 3,
            utc_offset_minutes: None,
            no_show_policy: NoShowPolicy::Retain,
            max_name_length: 100,
            allocation_attempts: 16,
            lock: LockConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl QueueConfig {
    /// Load configuration for a data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(data_dir.join(CONFIG_FILE)).required(false))
            .add_source(
                config::Environment::with_prefix("WALKIN_QUEUE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Write this configuration as YAML
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let prefix_ok = self
            .ticket_prefix
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
            && self
                .ticket_prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !prefix_ok {
            return Err(QueueError::validation(format!(
                "ticket_prefix must be uppercase letters or digits starting with a letter, got '{}'",
                self.ticket_prefix
            )));
        }
        if !(1..=6).contains(&self.number_width) {
            return Err(QueueError::validation("number_width must be between 1 and 6"));
        }
        if self.max_name_length == 0 {
            return Err(QueueError::validation("max_name_length must be positive"));
        }
        if self.allocation_attempts == 0 {
            return Err(QueueError::validation("allocation_attempts must be positive"));
        }
        self.offset()?;
        Ok(())
    }

    /// Offset that defines the operating day
    pub fn offset(&self) -> Result<FixedOffset> {
        match self.utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes.saturating_mul(60)).ok_or_else(|| {
                QueueError::validation(format!("utc_offset_minutes out of range: {minutes}"))
            }),
            None => Ok(Local::now().offset().fix()),
        }
    }
}
