//! Human-readable renderings of run results.
pub mod report;

pub use report::format_report;
