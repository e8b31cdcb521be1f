//! Issue records and their aggregate report.

pub mod report;
pub mod types;

pub use report::ValidationReport;
pub use types::{Issue, IssueCategory};
pub use stratguard_core::Severity;
