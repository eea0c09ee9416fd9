//! Command handlers
//!
//! Each handler opens the queue through [`HandlerContext`], calls one engine
//! operation and prints the result as text or, with `--json`, as one JSON
//! document.

mod common;
mod init;
mod join;
mod list;
mod remove;
mod report;
mod status;
mod transition;
mod update;

pub use common::{HandlerContext, caller_from_args};
pub use init::handle_init;
pub use join::{JoinArgs, handle_join_command};
pub use list::{handle_list_command, handle_show_command};
pub use remove::{handle_clear_command, handle_delete_command};
pub use report::{ReportArgs, handle_report_command};
pub use status::handle_status_command;
pub use transition::{handle_complete_command, handle_no_show_command, handle_serve_command};
pub use update::{UpdateArgs, handle_update_command};
