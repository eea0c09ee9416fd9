//! `update` command

use super::HandlerContext;
use crate::auth::Caller;
use crate::cli::output::OutputFormatter;
use crate::core::EntryUpdate;
use crate::error::Result;
use serde_json::json;

/// Arguments of the `update` command
#[derive(Debug, Clone, Default)]
pub struct UpdateArgs {
    pub entry: String,
    pub name: Option<String>,
    pub age: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<String>,
    pub service: Option<String>,
    pub set: Vec<String>,
}

impl UpdateArgs {
    /// Flatten the named flags and raw `--set` pairs into `key=value` form
    fn to_pairs(&self) -> Vec<String> {
        let named = [
            ("name", &self.name),
            ("age", &self.age),
            ("notes", &self.notes),
            ("priority", &self.priority),
            ("service", &self.service),
        ];
        named
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
            .chain(self.set.iter().cloned())
            .collect()
    }
}

/// Change an active entry's details
pub fn handle_update_command(
    args: &UpdateArgs,
    caller: &Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    caller.require_staff("update")?;
    let ctx = HandlerContext::new(data_dir)?;
    let update = EntryUpdate::from_pairs(&args.to_pairs(), ctx.engine.config().max_name_length)?;
    let entry = ctx.resolve_entry(&args.entry)?;

    let updated = ctx.engine.update_entry(caller, &entry.id, &update)?;

    if formatter.is_json() {
        formatter.print_json(&json!({
            "status": "success",
            "updated_fields": update.field_names(),
            "entry": updated,
        }))?;
    } else {
        formatter.success(&format!(
            "Updated {} ({})",
            updated.ticket_number,
            update.field_names().join(", ")
        ));
    }
    Ok(())
}
