//! walkin-queue - walk-in visit queue
//!
//! This is the main entry point for the walkin-queue CLI application.
//! It parses the command line, sets up logging and dispatches to the
//! command handlers.

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;
use walkin_queue::cli::handlers::{
    JoinArgs, ReportArgs, UpdateArgs, caller_from_args, handle_clear_command,
    handle_complete_command, handle_delete_command, handle_init, handle_join_command,
    handle_list_command, handle_no_show_command, handle_report_command, handle_serve_command,
    handle_show_command, handle_status_command, handle_update_command,
};
use walkin_queue::cli::{Cli, Commands, OutputFormatter};
use walkin_queue::error::{QueueError, Result};

/// Main entry point for the walkin-queue CLI
fn main() {
    let cli = Cli::parse();

    // Configure output formatter based on flags
    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Run the CLI application with the parsed arguments
///
/// # Errors
///
/// Returns any error that occurs during command execution
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let data_dir = cli.data_dir.as_deref();
    match cli.command {
        Commands::Init {
            prefix,
            utc_offset,
            force,
        } => handle_init(data_dir, prefix, utc_offset, force, formatter),
        Commands::Join {
            name,
            age,
            notes,
            priority,
            service,
        } => handle_join_command(
            JoinArgs {
                name,
                age,
                notes,
                priority,
                service,
            },
            data_dir,
            formatter,
        ),
        Commands::List {
            priority_first,
            status,
        } => handle_list_command(priority_first, status.as_deref(), data_dir, formatter),
        Commands::Show { entry } => handle_show_command(&entry, data_dir, formatter),
        Commands::Report {
            preset,
            from,
            to,
            sort,
            format,
            output,
            summary,
        } => handle_report_command(
            &ReportArgs {
                preset,
                from,
                to,
                sort,
                format,
                output,
                summary,
            },
            data_dir,
            formatter,
        ),
        Commands::Status => handle_status_command(data_dir, formatter),
        #[cfg(feature = "api")]
        Commands::Api { host, port } => run_api(data_dir, host, port),
        command => {
            let caller = caller_from_args(&cli.role, cli.operator.as_deref())?;
            dispatch_staff_command(command, &caller, data_dir, formatter)
        },
    }
}

/// Dispatch commands that act on behalf of a staff member
fn dispatch_staff_command(
    command: Commands,
    caller: &walkin_queue::auth::Caller,
    data_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Update {
            entry,
            name,
            age,
            notes,
            priority,
            service,
            set,
        } => handle_update_command(
            &UpdateArgs {
                entry,
                name,
                age,
                notes,
                priority,
                service,
                set,
            },
            caller,
            data_dir,
            formatter,
        ),
        Commands::Serve { entry } => {
            handle_serve_command(entry.as_deref(), caller, data_dir, formatter)
        },
        Commands::Complete { entry } => handle_complete_command(&entry, caller, data_dir, formatter),
        Commands::NoShow { entry } => handle_no_show_command(&entry, caller, data_dir, formatter),
        Commands::Delete { entry } => handle_delete_command(&entry, caller, data_dir, formatter),
        Commands::Clear { force } => handle_clear_command(force, caller, data_dir, formatter),
        other => Err(QueueError::custom(format!(
            "Command {other:?} is not a staff command"
        ))),
    }
}

/// Log to stderr so `--json` output on stdout stays parseable
///
/// `RUST_LOG` wins when set; otherwise `--verbose` switches on debug logs and
/// the default only shows warnings.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(feature = "api")]
fn run_api(data_dir: Option<&str>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(walkin_queue::api::serve(data_dir, host, port))
        .map_err(|e| QueueError::custom(format!("API server failed: {e:#}")))
}

/// Handle errors with user-friendly messages and suggestions
fn handle_error(error: &QueueError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        formatter.info("\nSuggestions:");
        for suggestion in &suggestions {
            formatter.info(&format!("  • {suggestion}"));
        }
    }

    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "error_type": format!("{:?}", error.kind()),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
