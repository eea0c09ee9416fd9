//! `delete` and `clear` commands

use super::HandlerContext;
use crate::auth::Caller;
use crate::cli::output::OutputFormatter;
use crate::error::{QueueError, Result};
use serde_json::json;

/// Remove one entry without archiving it
pub fn handle_delete_command(
    reference: &str,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    caller.require_staff("delete")?;
    let ctx = HandlerContext::new(data_dir)?;
    let entry = ctx.resolve_entry(reference)?;
    let deleted = ctx.engine.delete_entry(caller, &entry.id)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "deleted": deleted,
        }))?;
    } else {
        formatter.success(&format!(
            "Removed {} ({}) from the queue",
            deleted.ticket_number, deleted.display_name
        ));
    }
    Ok(())
}

/// Remove every active entry
pub fn handle_clear_command(
    force: bool,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    if !force {
        return Err(QueueError::validation(
            "Clearing removes every active ticket; re-run with --force to confirm",
        ));
    }

    let removed = ctx.engine.clear_queue(caller)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "removed": removed,
        }))?;
    } else {
        formatter.success(&format!("Cleared {removed} entries from the queue"));
    }
    Ok(())
}
