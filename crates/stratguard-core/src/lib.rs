//! # stratguard-core
//!
//! Foundation crate for the stratguard validation pipeline.
//! Defines shared types, errors, config and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod observability;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::StratguardConfig;
pub use errors::error_code::StratguardErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::severity::Severity;
