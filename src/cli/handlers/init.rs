//! `init` command

use crate::cli::output::OutputFormatter;
use crate::cli::utils::init_data_dir;
use crate::config::{CONFIG_FILE, QueueConfig};
use crate::error::Result;
use crate::storage::FileStorage;
use serde_json::json;

/// Create the data directory and, unless one exists, a configuration file
pub fn handle_init(
    data_dir: Option<&str>,
    prefix: Option<String>,
    utc_offset: Option<i32>,
    force: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let dir = init_data_dir(data_dir)?;
    let storage = FileStorage::new(&dir);
    let already_initialized = storage.is_initialized();
    storage.ensure_directories()?;

    let config_path = dir.join(CONFIG_FILE);
    let write_config = force || !config_path.exists();
    if write_config {
        let mut config = QueueConfig::default();
        if let Some(prefix) = prefix {
            config.ticket_prefix = prefix.trim().to_uppercase();
        }
        config.utc_offset_minutes = utc_offset;
        config.validate()?;
        config.save(&dir)?;
    } else if prefix.is_some() || utc_offset.is_some() {
        formatter.warning(&format!(
            "{} already exists; pass --force to overwrite it",
            config_path.display()
        ));
    }

    tracing::info!(path = %dir.display(), already_initialized, "Initialized queue");

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "data_dir": dir,
            "already_initialized": already_initialized,
            "config_written": write_config,
        }))?;
    } else if already_initialized {
        formatter.info(&format!("Queue already initialized at {}", dir.display()));
    } else {
        formatter.success(&format!("Initialized walk-in queue at {}", dir.display()));
        formatter.info("Next: walkin-queue join \"<name>\"");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_layout_and_config() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".walkin-queue");

        handle_init(
            dir.to_str(),
            Some("b".into()),
            Some(480),
            false,
            &OutputFormatter::new(true, true),
        )
        .unwrap();

        assert!(FileStorage::new(&dir).is_initialized());
        let content = std::fs::read_to_string(dir.join(CONFIG_FILE)).unwrap();
        let config: QueueConfig = serde_yaml::from_str(&content).unwrap();
        assert_eq!(config.ticket_prefix, "B");
        assert_eq!(config.utc_offset_minutes, Some(480));
    }

    #[test]
    fn test_init_rejects_bad_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".walkin-queue");

        let result = handle_init(
            dir.to_str(),
            Some("A-".into()),
            None,
            false,
            &OutputFormatter::new(true, true),
        );
        assert!(result.is_err());
        assert!(!dir.join(CONFIG_FILE).exists());
    }
}
