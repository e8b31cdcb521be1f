//! Defect detectors. Each finds one category of structural defect.
//!
//! Tree-mode detectors read scoping facts from the syntax tree; text-mode
//! detectors read structural-position facts from raw lines.

pub mod branch_scan;
pub mod context;
pub mod field_init;
pub mod guard_check;
pub mod indentation;
pub mod orphaned_branch;
pub mod registry;
pub mod required_methods;
pub mod strategy;
pub mod syntax;
pub mod traits;
pub mod variables;

pub use context::DetectionContext;
pub use registry::{create_default_registry, DetectorRegistry};
pub use traits::{DetectionMode, Detector};
