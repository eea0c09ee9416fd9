//! Command-line interface
//!
//! Argument definitions live here; each command's logic is in [`handlers`].

pub mod handlers;
pub mod output;
pub mod utils;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand};

/// Walk-in queue: tickets, daily reset and served-ticket reports
#[derive(Parser, Debug)]
#[command(name = "walkin-queue", version, about, long_about = None)]
pub struct Cli {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Queue data directory (defaults to the nearest .walkin-queue)
    #[arg(long, global = true, env = "WALKIN_QUEUE_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Role of the person running the command
    #[arg(long, global = true, env = "WALKIN_QUEUE_ROLE", default_value = "staff")]
    pub role: String,

    /// Name recorded in logs for staff actions
    #[arg(long, global = true, env = "WALKIN_QUEUE_OPERATOR")]
    pub operator: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the queue data directory
    Init {
        /// Ticket prefix, e.g. A
        #[arg(long)]
        prefix: Option<String>,

        /// Offset from UTC in minutes that defines the operating day
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<i32>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Take a ticket
    Join {
        /// Visitor's name
        name: String,

        #[arg(long)]
        age: Option<u16>,

        #[arg(long)]
        notes: Option<String>,

        /// regular or priority
        #[arg(short, long, default_value = "regular")]
        priority: String,

        /// Requested service
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Show the active queue
    List {
        /// Order by serving order (priority class first)
        #[arg(long)]
        priority_first: bool,

        /// Only show entries with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one active entry
    Show {
        /// Ticket number or entry id
        entry: String,
    },

    /// Change an active entry's details
    Update {
        /// Ticket number or entry id
        entry: String,

        #[arg(long)]
        name: Option<String>,

        /// New age; pass an empty string to clear
        #[arg(long)]
        age: Option<String>,

        /// New notes; pass an empty string to clear
        #[arg(long)]
        notes: Option<String>,

        /// regular or priority
        #[arg(long)]
        priority: Option<String>,

        /// New service; pass an empty string to clear
        #[arg(long)]
        service: Option<String>,

        /// Raw field assignment, e.g. --set service=Ultrasound
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Call a waiting visitor (the next in serving order if none given)
    Serve {
        /// Ticket number or entry id
        entry: Option<String>,
    },

    /// Finish serving a visitor and archive the ticket
    Complete {
        /// Ticket number or entry id
        entry: String,
    },

    /// Mark a visitor who did not answer the call
    NoShow {
        /// Ticket number or entry id
        entry: String,
    },

    /// Remove an entry without archiving it
    Delete {
        /// Ticket number or entry id
        entry: String,
    },

    /// Remove every active entry
    Clear {
        /// Required to actually clear
        #[arg(short, long)]
        force: bool,
    },

    /// Report on served tickets
    Report {
        /// today, yesterday, this_week or this_month
        #[arg(long, conflicts_with_all = ["from", "to"])]
        preset: Option<String>,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// archivedAt, ticketNumber or displayName; prefix with - for descending
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,

        /// Export format: json, yaml or csv
        #[arg(short, long)]
        format: Option<String>,

        /// Write the export to a file
        #[arg(short, long)]
        output: Option<String>,

        /// Show totals instead of individual tickets
        #[arg(long)]
        summary: bool,
    },

    /// Show queue status
    Status,

    /// Run the HTTP API
    #[cfg(feature = "api")]
    Api {
        /// Address to bind (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
