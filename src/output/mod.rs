//! Output module.
//!
//! The result sink receives open targets; the plain formatter covers the
//! console header, progress line and summary.

mod plain;
mod sink;

pub use plain::{print_error, print_info, print_scan_header, print_summary, progress_bar};
pub use sink::{OpenPortSink, ResultSink};
