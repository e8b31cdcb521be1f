//! # stratguard-analysis
//!
//! Validation engine for generated strategy classes.
//! Contains the source model, defect detectors, validator, fix generators,
//! fix applier, pipeline orchestrator and the Execute-stage runners.

pub mod detectors;
pub mod fixes;
pub mod issues;
pub mod lines;
pub mod parsers;
pub mod pipeline;
pub mod runner;
pub mod validator;

pub use fixes::{FixApplier, FixerRegistry};
pub use issues::{Issue, IssueCategory, ValidationReport};
pub use parsers::{SourceParser, SourceUnit};
pub use pipeline::{BatchReport, PipelineOrchestrator, PipelineResult};
pub use validator::Validator;
