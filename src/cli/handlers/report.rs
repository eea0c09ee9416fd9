//! `report` command

use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::error::Result;
use crate::report::{ExportFormat, ReportQuery};
use serde_json::json;
use std::path::Path;

/// Arguments of the `report` command
#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    pub preset: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub summary: bool,
}

/// Report on served tickets
pub fn handle_report_command(
    args: &ReportArgs,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(data_dir)?;
    let query = ReportQuery::from_params(
        args.from.as_deref(),
        args.to.as_deref(),
        args.preset.as_deref(),
        args.sort.as_deref(),
    )?;

    if args.summary {
        let summary = ctx.engine.report_summary(&query.range)?;
        if formatter.is_json() {
            formatter.print_json(&summary)?;
        } else {
            print_summary(&summary, formatter);
        }
        return Ok(());
    }

    let records = ctx.engine.reports(&query)?;

    if let Some(format) = export_format(args)? {
        let rendered = format.render(&records)?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                if formatter.is_json() {
                    formatter.print_json(&json!({
                        "status": "success",
                        "format": format.to_string(),
                        "output": path,
                        "count": records.len(),
                    }))?;
                } else {
                    formatter.success(&format!(
                        "Exported {} records to {path}",
                        records.len()
                    ));
                }
            },
            None => print!("{rendered}"),
        }
        return Ok(());
    }

    let (from, to) = query.range.resolve(ctx.engine.today())?;
    if formatter.is_json() {
        formatter.print_json(&json!({
            "from": from,
            "to": to,
            "sort": query.sort.to_string(),
            "count": records.len(),
            "records": records,
        }))?;
    } else {
        formatter.print_records(&records, ctx.engine.offset());
        formatter.info(&format!(
            "\n{} served tickets from {from} to {to}",
            records.len()
        ));
    }
    Ok(())
}

/// Export format from `--format`, or guessed from the `--output` extension
fn export_format(args: &ReportArgs) -> Result<Option<ExportFormat>> {
    if let Some(format) = &args.format {
        return format.parse().map(Some);
    }
    Ok(args.output.as_ref().map(|path| {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }))
}

fn print_summary(summary: &crate::report::ReportSummary, formatter: &OutputFormatter) {
    formatter.info(&format!(
        "Served tickets {} to {}: {}",
        summary.from, summary.to, summary.total
    ));
    formatter.info(&format!(
        "  priority: {}, regular: {}",
        summary.priority, summary.regular
    ));
    if let Some(wait) = summary.average_wait_minutes {
        formatter.info(&format!("  average wait: {wait:.1} min"));
    }
    if let Some(service) = summary.average_service_minutes {
        formatter.info(&format!("  average service time: {service:.1} min"));
    }
    if !summary.by_service.is_empty() {
        formatter.info("  by service:");
        for (service, count) in &summary.by_service {
            formatter.info(&format!("    {service}: {count}"));
        }
    }
}
