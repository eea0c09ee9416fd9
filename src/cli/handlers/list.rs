//! `list` and `show` commands

use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::core::Status;
use crate::error::Result;
use serde_json::json;

/// Show the active queue
pub fn handle_list_command(
    priority_first: bool,
    status: Option<&str>,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    let status: Option<Status> = status.map(str::parse).transpose()?;

    let mut entries = if priority_first {
        ctx.engine.list_serving_order()?
    } else {
        ctx.engine.list_active()?
    };
    if let Some(status) = status {
        entries.retain(|e| e.status == status);
    }

    if formatter.is_json() {
        formatter.print_json(&json!({
            "operating_day": ctx.engine.today(),
            "count": entries.len(),
            "entries": entries,
        }))?;
        return Ok(());
    }

    formatter.print_entries(&entries, ctx.engine.now(), ctx.engine.offset());
    if !entries.is_empty() {
        let count = |s: Status| entries.iter().filter(|e| e.status == s).count();
        formatter.info(&format!(
            "\n{} waiting, {} serving, {} no-show",
            count(Status::Waiting),
            count(Status::Serving),
            count(Status::NoShow)
        ));
    }
    Ok(())
}

/// Show one active entry
pub fn handle_show_command(
    reference: &str,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    let entry = ctx.resolve_entry(reference)?;

    if formatter.is_json() {
        formatter.print_json(&entry)?;
    } else {
        formatter.print_entry(&entry, ctx.engine.offset());
    }
    Ok(())
}
