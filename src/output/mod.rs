//! Output of provisioning runs.
//!
//! - [`terminal`] - completion markers and the run summary
//! - [`report`] - JSON report written with `--report`

mod report;
mod terminal;

pub use report::RunReport;
pub use terminal::{done_marker, format_resource, print_done, print_summary};
