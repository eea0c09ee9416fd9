//! `serve`, `complete` and `no-show` commands

use super::HandlerContext;
use crate::auth::Caller;
use crate::cli::output::OutputFormatter;
use crate::engine::lifecycle::next_to_serve;
use crate::error::{QueueError, Result};
use serde_json::json;

/// Call a visitor; without a reference, the next one in serving order
pub fn handle_serve_command(
    reference: Option<&str>,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    caller.require_staff("serve")?;

    let entry = match reference {
        Some(reference) => ctx.resolve_entry(reference)?,
        None => {
            let entries = ctx.engine.list_active()?;
            next_to_serve(&entries)
                .cloned()
                .ok_or_else(|| QueueError::EntryNotFound {
                    id: "next waiting visitor".to_string(),
                })?
        },
    };

    let serving = ctx.engine.advance_to_serving(caller, &entry.id)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "entry": serving,
        }))?;
    } else {
        formatter.success(&format!(
            "Now serving {} ({})",
            serving.ticket_number, serving.display_name
        ));
    }
    Ok(())
}

/// Finish serving a visitor
pub fn handle_complete_command(
    reference: &str,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    caller.require_staff("complete")?;
    let ctx = HandlerContext::new(data_dir)?;
    let entry = ctx.resolve_entry(reference)?;
    let record = ctx.engine.complete_serving(caller, &entry.id)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "record": record,
        }))?;
    } else {
        formatter.success(&format!(
            "Completed {} ({})",
            record.ticket_number, record.display_name
        ));
        if let Some(minutes) = record.wait_minutes() {
            formatter.info(&format!("Waited {minutes} min"));
        }
    }
    Ok(())
}

/// Mark a visitor as not present
pub fn handle_no_show_command(
    reference: &str,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    caller.require_staff("no-show")?;
    let ctx = HandlerContext::new(data_dir)?;
    let entry = ctx.resolve_entry(reference)?;
    let marked = ctx.engine.mark_no_show(caller, &entry.id)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "policy": ctx.engine.config().no_show_policy,
            "entry": marked,
        }))?;
    } else {
        formatter.warning(&format!(
            "{} ({}) marked as no-show",
            marked.ticket_number, marked.display_name
        ));
    }
    Ok(())
}
