//! End-to-end pass over a batch of source units.

pub mod io;
pub mod orchestrator;
pub mod types;

pub use io::{LoadedInput, SourceInput};
pub use orchestrator::PipelineOrchestrator;
pub use types::{BatchReport, ExecutionResult, FixStatus, FixSummary, PipelineResult, StageCounts};
