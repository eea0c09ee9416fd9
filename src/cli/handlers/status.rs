//! `status` command

use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::core::Status;
use crate::engine::lifecycle::next_to_serve;
use crate::error::Result;
use crate::report::RangeSpec;
use crate::storage::DayRepository;
use serde_json::json;

/// Show where the queue stands today
pub fn handle_status_command(data_dir: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    let entries = ctx.engine.list_active()?;
    let last_reset = ctx
        .engine
        .store()
        .load_reset_log()?
        .map(|log| log.last_reset_date);
    let served_today = ctx.engine.report_summary(&RangeSpec::default())?.total;

    let count = |s: Status| entries.iter().filter(|e| e.status == s).count();
    let next = next_to_serve(&entries);
    let config = ctx.engine.config();

    if formatter.is_json() {
        formatter.print_json(&json!({
            "data_dir": ctx.data_dir,
            "operating_day": ctx.engine.today(),
            "last_reset_date": last_reset,
            "waiting": count(Status::Waiting),
            "serving": count(Status::Serving),
            "no_show": count(Status::NoShow),
            "served_today": served_today,
            "next": next.map(|e| e.ticket_number.to_string()),
            "ticket_prefix": config.ticket_prefix,
            "no_show_policy": config.no_show_policy,
        }))?;
        return Ok(());
    }

    formatter.info(&format!("Data directory: {}", ctx.data_dir.display()));
    formatter.info(&format!("Operating day:  {}", ctx.engine.today()));
    formatter.info(&format!(
        "Waiting: {}  Serving: {}  No-show: {}  Served today: {}",
        count(Status::Waiting),
        count(Status::Serving),
        count(Status::NoShow),
        served_today
    ));
    match next {
        Some(entry) => formatter.info(&format!(
            "Next up:        {} ({})",
            entry.ticket_number, entry.display_name
        )),
        None => formatter.info("Next up:        nobody waiting"),
    }
    Ok(())
}
