//! `join` command

use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::core::PriorityClass;
use crate::engine::JoinRequest;
use crate::error::Result;
use serde_json::json;

/// Arguments of the `join` command
#[derive(Debug, Clone)]
pub struct JoinArgs {
    pub name: String,
    pub age: Option<u16>,
    pub notes: Option<String>,
    pub priority: String,
    pub service: Option<String>,
}

/// Take a ticket
pub fn handle_join_command(
    args: JoinArgs,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    let priority_class: PriorityClass = args.priority.parse()?;

    let entry = ctx.engine.join(JoinRequest {
        display_name: args.name,
        age: args.age,
        notes: args.notes,
        priority_class,
        selected_service: args.service,
    })?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "entry": entry,
        }))?;
    } else {
        formatter.success(&format!(
            "{} joined the queue with ticket {}",
            entry.display_name, entry.ticket_number
        ));
        if entry.priority_class == PriorityClass::Priority {
            formatter.info("Marked as priority");
        }
    }

    Ok(())
}
